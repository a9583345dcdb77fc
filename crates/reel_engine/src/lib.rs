//! Reel engine: sheet retrieval, tokenizing and record assembly.
mod assemble;
mod columns;
mod config;
mod csv;
mod decode;
mod engine;
mod fetch;
mod gviz;
mod loader;
mod locate;
mod slot;
mod strategy;
mod types;

pub use assemble::{
    assemble, assemble_rows, next_window, strip_label, AssemblyMode, CATEGORY_LABEL, MAX_WINDOW,
    STYLE_LABEL, SUCCESS_MARKER,
};
pub use columns::{find_column, normalize_header, ColumnIndex, Field};
pub use config::{LoaderConfig, DEFAULT_CHANNEL_TIMEOUT, DEFAULT_ERROR_DETAIL_LIMIT, DEFAULT_SHEETS_BASE};
pub use csv::tokenize;
pub use decode::decode_text;
pub use engine::{ChannelProgressSink, LoaderHandle};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use gviz::{extract_payload, gviz_json_url, table_from_response, GvizStrategy};
pub use loader::{
    candidate_csv_urls, run_strategies, LoadError, NullSink, ProgressSink, SheetLoader,
};
pub use slot::{ResponseHandler, ResponseSlot, SlotToken};
pub use strategy::{
    looks_like_html, relay_url, CsvStrategy, Step, StepFailure, Strategy, StrategyError,
};
pub use types::{
    DomainRecord, FailureKind, FetchError, FetchMetadata, FetchOutput, LoadEvent, RawTable,
    RequestId, Row, SourceRef,
};
