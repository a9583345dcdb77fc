use crate::{RawTable, Row};

/// Tokenize comma-delimited text into rows of string cells.
///
/// Quoted cells may contain commas, line breaks and doubled quotes (`""`),
/// which decode to a single literal quote. `\r`, `\n` and `\r\n` all end a
/// row. Lines with no content at all produce no row. A final row without a
/// terminator is still emitted.
pub fn tokenize(text: &str) -> RawTable {
    let mut tokenizer = Tokenizer::default();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if tokenizer.in_quotes && chars.peek() == Some(&'"') {
                    chars.next();
                    tokenizer.value.push('"');
                } else {
                    tokenizer.in_quotes = !tokenizer.in_quotes;
                }
            }
            ',' if !tokenizer.in_quotes => tokenizer.end_cell(),
            '\r' | '\n' if !tokenizer.in_quotes => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                tokenizer.end_row();
            }
            _ => tokenizer.value.push(c),
        }
    }
    tokenizer.end_row();

    RawTable::new(tokenizer.rows)
}

#[derive(Default)]
struct Tokenizer {
    rows: Vec<Row>,
    row: Row,
    value: String,
    in_quotes: bool,
}

impl Tokenizer {
    fn end_cell(&mut self) {
        self.row.push(std::mem::take(&mut self.value));
    }

    fn end_row(&mut self) {
        if !self.value.is_empty() || !self.row.is_empty() {
            self.end_cell();
            self.rows.push(std::mem::take(&mut self.row));
        }
    }
}
