use std::fmt;

use serde::Serialize;

use crate::loader::LoadError;
use crate::strategy::StepFailure;

pub type RequestId = u64;

/// One tokenized row: ordered string cells, possibly ragged.
pub type Row = Vec<String>;

/// Document and tab identifiers extracted from a sheet URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub document_id: String,
    pub tab_id: String,
}

/// Tabular data as retrieved by a fetch strategy. Row 0 is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Row>,
}

impl RawTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows after the header.
    pub fn data(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl From<Vec<Row>> for RawTable {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

/// A reconstructed generation event. Only complete groups (with an output
/// URL) become records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub id: usize,
    pub input1_url: Option<String>,
    pub input2_url: Option<String>,
    pub style_name: String,
    pub category_name: String,
    pub output_url: String,
    pub timestamp: String,
    pub country: String,
    pub subscription_status: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    StepStarted {
        request_id: RequestId,
        step: crate::Step,
    },
    StepFailed {
        request_id: RequestId,
        failure: StepFailure,
    },
    Finished {
        request_id: RequestId,
        result: Result<Vec<DomainRecord>, LoadError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
