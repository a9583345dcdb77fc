//! Record assembly: turns one-parameter-per-row event exports into
//! [`DomainRecord`]s.
//!
//! With event classification columns present, rows are grouped into windows
//! of at most [`MAX_WINDOW`] consecutive "success" events. Without them the
//! rows are read as a plain key/value stream and a record closes on `output`.
//! Malformed or incomplete groups are dropped silently.

use std::ops::Range;

use crate::columns::ColumnIndex;
use crate::{DomainRecord, RawTable, Row};

pub const MAX_WINDOW: usize = 5;
pub const SUCCESS_MARKER: &str = "success";
pub const STYLE_LABEL: &str = "Style Name:";
pub const CATEGORY_LABEL: &str = "Category Name:";
const MISSING_STATUS: &str = "#N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyMode {
    Windowed,
    Streaming,
}

impl AssemblyMode {
    pub fn for_columns(columns: &ColumnIndex) -> Self {
        if columns.has_classification() {
            AssemblyMode::Windowed
        } else {
            AssemblyMode::Streaming
        }
    }
}

/// Assemble records from a table whose first row is the header.
pub fn assemble(table: &RawTable) -> Vec<DomainRecord> {
    let columns = ColumnIndex::resolve(table.header());
    assemble_rows(table.data(), &columns)
}

pub fn assemble_rows(rows: &[Row], columns: &ColumnIndex) -> Vec<DomainRecord> {
    let records = match AssemblyMode::for_columns(columns) {
        AssemblyMode::Windowed => assemble_windowed(rows, columns),
        AssemblyMode::Streaming => assemble_streaming(rows, columns),
    };
    reel_logging::reel_debug!(
        "assembled {} record(s) from {} data row(s)",
        records.len(),
        rows.len()
    );
    records
}

/// Locate the next success window at or after `from`.
///
/// The returned range starts at the first row whose event name contains
/// "success" and ends at the first following row that does not, or after
/// [`MAX_WINDOW`] rows, whichever comes first.
pub fn next_window(rows: &[Row], from: usize, event_col: usize) -> Option<Range<usize>> {
    let start = (from..rows.len()).find(|&i| is_success(&rows[i], event_col))?;
    let limit = rows.len().min(start + MAX_WINDOW);
    let end = (start..limit)
        .find(|&i| !is_success(&rows[i], event_col))
        .unwrap_or(limit);
    Some(start..end)
}

fn is_success(row: &[String], event_col: usize) -> bool {
    cell(row, Some(event_col))
        .to_lowercase()
        .contains(SUCCESS_MARKER)
}

fn assemble_windowed(rows: &[Row], columns: &ColumnIndex) -> Vec<DomainRecord> {
    let mut records = Vec::new();
    let Some(event_col) = columns.event_name else {
        return records;
    };

    let mut cursor = 0;
    while let Some(window) = next_window(rows, cursor, event_col) {
        cursor = window.end;
        let mut group = Group::default();
        for row in &rows[window] {
            group.set_param(cell(row, columns.param_key), cell(row, columns.param_value));
            group.fill_context(row, columns);
        }
        if let Some(record) = group.into_record(records.len()) {
            records.push(record);
        }
    }
    records
}

fn assemble_streaming(rows: &[Row], columns: &ColumnIndex) -> Vec<DomainRecord> {
    let mut records = Vec::new();
    let mut group = Group::default();

    for row in rows {
        let key = cell(row, columns.param_key);
        let value = non_empty(cell(row, columns.param_value));
        match key {
            "input1" => {
                if group.has_any() {
                    group.flush(&mut records);
                }
                group.input1 = value;
                group.overwrite_context(row, columns, false);
            }
            "input2" => {
                group.input2 = value;
                group.overwrite_context(row, columns, true);
            }
            "style" => {
                if group.has_classification() {
                    group.flush(&mut records);
                }
                group.style = value;
                group.overwrite_context(row, columns, false);
            }
            "category" => {
                group.category = value;
                group.overwrite_context(row, columns, true);
            }
            "output" => {
                group.output = value;
                group.overwrite_context(row, columns, true);
                group.flush(&mut records);
            }
            _ => {}
        }
    }
    group.flush(&mut records);
    records
}

/// Accumulator for one prospective record. Empty cells count as unset.
#[derive(Debug, Default)]
struct Group {
    input1: Option<String>,
    input2: Option<String>,
    style: Option<String>,
    category: Option<String>,
    output: Option<String>,
    timestamp: Option<String>,
    country: Option<String>,
    subscription_status: Option<String>,
    user_id: Option<String>,
}

impl Group {
    fn set_param(&mut self, key: &str, value: &str) {
        let value = non_empty(value);
        match key {
            "input1" => self.input1 = value,
            "input2" => self.input2 = value,
            "style" => self.style = value,
            "category" => self.category = value,
            "output" => self.output = value,
            _ => {}
        }
    }

    /// First non-empty value per context field wins.
    fn fill_context(&mut self, row: &[String], columns: &ColumnIndex) {
        if self.timestamp.is_none() {
            self.timestamp = non_empty(cell(row, columns.timestamp));
        }
        if self.country.is_none() {
            self.country = non_empty(cell(row, columns.country));
        }
        if self.subscription_status.is_none() {
            self.subscription_status = subscription(row, columns);
        }
        if self.user_id.is_none() {
            self.user_id = non_empty(cell(row, columns.user_id));
        }
    }

    /// Last row wins. With `keep_status`, a missing status keeps the
    /// previous one instead of clearing it.
    fn overwrite_context(&mut self, row: &[String], columns: &ColumnIndex, keep_status: bool) {
        self.timestamp = non_empty(cell(row, columns.timestamp));
        self.country = non_empty(cell(row, columns.country));
        let status = subscription(row, columns);
        if !keep_status || status.is_some() {
            self.subscription_status = status;
        }
        if columns.user_id.is_some() {
            self.user_id = non_empty(cell(row, columns.user_id));
        }
    }

    fn has_any(&self) -> bool {
        self.input1.is_some() || self.input2.is_some() || self.has_classification()
    }

    fn has_classification(&self) -> bool {
        self.style.is_some() || self.category.is_some() || self.output.is_some()
    }

    /// Emit the group if complete. A group with no classification at all is
    /// kept open; anything else resets.
    fn flush(&mut self, records: &mut Vec<DomainRecord>) {
        if !self.has_classification() {
            return;
        }
        if let Some(record) = std::mem::take(self).into_record(records.len()) {
            records.push(record);
        }
    }

    fn into_record(self, id: usize) -> Option<DomainRecord> {
        let output_url = self.output?;
        Some(DomainRecord {
            id,
            input1_url: self.input1,
            input2_url: self.input2,
            style_name: strip_label(self.style.as_deref().unwrap_or_default(), STYLE_LABEL),
            category_name: strip_label(
                self.category.as_deref().unwrap_or_default(),
                CATEGORY_LABEL,
            ),
            output_url,
            timestamp: self.timestamp.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            subscription_status: self.subscription_status.unwrap_or_default(),
            user_id: self.user_id.unwrap_or_default(),
        })
    }
}

fn subscription(row: &[String], columns: &ColumnIndex) -> Option<String> {
    non_empty(cell(row, columns.subscription_status)).filter(|status| status != MISSING_STATUS)
}

/// Drop everything up to and including `label`, then trim. Text without the
/// label is returned unchanged.
pub fn strip_label(text: &str, label: &str) -> String {
    match text.find(label) {
        Some(pos) => text[pos + label.len()..].trim().to_string(),
        None => text.to_string(),
    }
}

fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| row.get(i))
        .map(String::as_str)
        .unwrap_or("")
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
