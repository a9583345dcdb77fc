use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use url::Url;

use crate::decode::decode_text;
use crate::fetch::Fetcher;
use crate::{csv, FailureKind, FetchError, RawTable};

/// Identifies a retrieval strategy in logs and aggregated failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Structured query channel (JSON wrapped in a response callback).
    GvizJsonp,
    /// Tab-scoped CSV export routed through the relay.
    ProxiedCsv,
    /// The raw input URL routed through the relay.
    DirectProxied,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::GvizJsonp => "gviz_jsonp",
            Step::ProxiedCsv => "proxied_csv",
            Step::DirectProxied => "direct_proxied",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    /// Raised while planning, before any step runs; the load carries on with
    /// the direct relay alone, so it never appears in a [`StepFailure`].
    #[error("no document identifier in {0:?}")]
    InvalidSource(String),
    #[error("HTTP {status}")]
    HttpFailure { status: u16 },
    #[error("HTML received")]
    HtmlPayloadRejected,
    #[error("script load error: {0}")]
    ScriptLoadFailure(String),
    #[error("timeout after {millis} ms")]
    ChannelTimeout { millis: u64 },
    #[error("empty result")]
    EmptyResult,
    #[error("network error: {0}")]
    Network(String),
}

impl From<FetchError> for StrategyError {
    fn from(err: FetchError) -> Self {
        match err.kind {
            FailureKind::HttpStatus(status) => StrategyError::HttpFailure { status },
            _ => StrategyError::Network(err.to_string()),
        }
    }
}

/// One failed attempt, kept for the aggregate error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    pub step: Step,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(serialize_with = "serialize_display")]
    pub error: StrategyError,
}

fn serialize_display<S: Serializer>(error: &StrategyError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// A single way of retrieving the sheet as rows.
#[async_trait::async_trait]
pub trait Strategy: Send + Sync {
    fn step(&self) -> Step;

    /// URL reported alongside a failure of this strategy.
    fn target_url(&self) -> Option<&str> {
        None
    }

    async fn attempt(&self) -> Result<RawTable, StrategyError>;
}

/// Fetches delimited text (optionally through the relay) and tokenizes it.
pub struct CsvStrategy {
    step: Step,
    target: String,
    request_url: String,
    fetcher: Arc<dyn Fetcher>,
}

impl CsvStrategy {
    pub fn new(step: Step, target: impl Into<String>, relay: Option<&Url>, fetcher: Arc<dyn Fetcher>) -> Self {
        let target = target.into();
        let request_url = match relay {
            Some(base) => relay_url(base, &target),
            None => target.clone(),
        };
        Self {
            step,
            target,
            request_url,
            fetcher,
        }
    }

    pub fn request_url(&self) -> &str {
        &self.request_url
    }
}

#[async_trait::async_trait]
impl Strategy for CsvStrategy {
    fn step(&self) -> Step {
        self.step
    }

    fn target_url(&self) -> Option<&str> {
        Some(&self.target)
    }

    async fn attempt(&self) -> Result<RawTable, StrategyError> {
        let output = self.fetcher.fetch(&self.request_url).await?;
        let text = decode_text(&output.bytes, output.metadata.content_type.as_deref());
        if looks_like_html(&text) {
            return Err(StrategyError::HtmlPayloadRejected);
        }
        let table = csv::tokenize(&text);
        if table.is_empty() {
            return Err(StrategyError::EmptyResult);
        }
        Ok(table)
    }
}

/// `<relay>/proxy?url=<percent-encoded target>`.
pub fn relay_url(base: &Url, target: &str) -> String {
    let path = format!("{}/proxy", base.path().trim_end_matches('/'));
    let mut url = base.clone();
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut().append_pair("url", target);
    url.to_string()
}

/// Sign-in and error pages come back as HTML documents instead of data.
pub fn looks_like_html(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower
        .find("<html")
        .is_some_and(|start| lower[start..].contains('>'))
}
