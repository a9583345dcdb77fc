use pretty_assertions::assert_eq;
use reel_engine::tokenize;

fn rows(text: &str) -> Vec<Vec<String>> {
    tokenize(text).into_rows()
}

#[test]
fn quoted_cell_keeps_delimiters_newlines_and_escaped_quotes() {
    assert_eq!(
        rows("a,\"b,c\nd\"\"e\""),
        vec![vec!["a".to_string(), "b,c\nd\"e".to_string()]]
    );
}

#[test]
fn crlf_is_a_single_row_terminator() {
    assert_eq!(
        rows("h1,h2\r\nx,y\r\n"),
        vec![
            vec!["h1".to_string(), "h2".to_string()],
            vec!["x".to_string(), "y".to_string()],
        ]
    );
}

#[test]
fn bare_carriage_return_ends_a_row() {
    assert_eq!(rows("a\rb").len(), 2);
}

#[test]
fn trailing_row_without_terminator_is_flushed() {
    assert_eq!(
        rows("a,b\nc"),
        vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string()],
        ]
    );
}

#[test]
fn blank_lines_are_skipped_but_empty_cells_survive() {
    assert_eq!(
        rows("a,,\n\n\n,b\n"),
        vec![
            vec!["a".to_string(), String::new(), String::new()],
            vec![String::new(), "b".to_string()],
        ]
    );
}

#[test]
fn ragged_rows_are_preserved() {
    let table = tokenize("a,b,c\n1\n2,3\n");
    let lengths: Vec<usize> = table.rows().iter().map(Vec::len).collect();
    assert_eq!(lengths, vec![3, 1, 2]);
}

#[test]
fn empty_input_has_no_rows() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("\r\n\n").is_empty());
}
