use std::sync::Arc;

use reel_logging::{reel_debug, reel_error, reel_info, reel_warn};
use url::Url;

use crate::assemble::assemble;
use crate::config::LoaderConfig;
use crate::fetch::{Fetcher, ReqwestFetcher};
use crate::gviz::GvizStrategy;
use crate::locate::query_value;
use crate::slot::ResponseSlot;
use crate::strategy::{CsvStrategy, Step, StepFailure, Strategy, StrategyError};
use crate::{DomainRecord, LoadEvent, RawTable, RequestId, SourceRef};

/// Every strategy failed; `failures` lists them in the order attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to load sheet: {detail}")]
pub struct LoadError {
    pub failures: Vec<StepFailure>,
    /// JSON rendering of `failures`, cut to the configured length.
    pub detail: String,
}

impl LoadError {
    pub fn from_failures(failures: Vec<StepFailure>, detail_limit: usize) -> Self {
        let json = serde_json::to_string(&failures).unwrap_or_else(|err| err.to_string());
        let detail = json.chars().take(detail_limit).collect();
        Self { failures, detail }
    }

    pub fn steps(&self) -> Vec<Step> {
        self.failures.iter().map(|failure| failure.step).collect()
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: LoadEvent);
}

/// Discards progress events.
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: LoadEvent) {}
}

/// Tab-scoped export URLs: native CSV export, then CSV via the query channel.
pub fn candidate_csv_urls(base: &Url, source: &SourceRef) -> [String; 2] {
    let root = base.as_str().trim_end_matches('/');
    let id = &source.document_id;
    let tab = query_value(source.tab_or_default());
    [
        format!("{root}/spreadsheets/d/{id}/export?format=csv&gid={tab}"),
        format!("{root}/spreadsheets/d/{id}/gviz/tq?tqx=out:csv&gid={tab}"),
    ]
}

/// Try each strategy in order until one yields at least one row.
pub async fn run_strategies(
    request_id: RequestId,
    strategies: &[Box<dyn Strategy>],
    sink: &dyn ProgressSink,
    detail_limit: usize,
) -> Result<RawTable, LoadError> {
    let mut failures = Vec::new();

    for strategy in strategies {
        let step = strategy.step();
        reel_debug!("request {request_id}: trying {step} {:?}", strategy.target_url());
        sink.emit(LoadEvent::StepStarted { request_id, step });

        let error = match strategy.attempt().await {
            Ok(table) if !table.is_empty() => {
                reel_info!("request {request_id}: {step} returned {} row(s)", table.len());
                return Ok(table);
            }
            Ok(_) => StrategyError::EmptyResult,
            Err(err) => err,
        };

        let failure = StepFailure {
            step,
            url: strategy.target_url().map(str::to_string),
            error,
        };
        reel_warn!(
            "request {request_id}: {step} failed for {:?}: {}",
            failure.url,
            failure.error
        );
        sink.emit(LoadEvent::StepFailed {
            request_id,
            failure: failure.clone(),
        });
        failures.push(failure);
    }

    let err = LoadError::from_failures(failures, detail_limit);
    reel_error!("request {request_id}: {err}");
    Err(err)
}

/// Loads a sheet by trying the configured retrieval strategies in sequence.
pub struct SheetLoader {
    config: LoaderConfig,
    fetcher: Arc<dyn Fetcher>,
    slot: Arc<ResponseSlot>,
}

impl SheetLoader {
    pub fn new(config: LoaderConfig) -> Self {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone()));
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: LoaderConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            fetcher,
            slot: Arc::new(ResponseSlot::new()),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The response slot used by the structured-data channel.
    pub fn slot(&self) -> &Arc<ResponseSlot> {
        &self.slot
    }

    /// Strategies for `input`, in the order they are attempted.
    ///
    /// Tab-scoped strategies need a resolvable [`SourceRef`]; the direct
    /// relay of the raw input is always last.
    pub fn plan(&self, input: &str) -> Vec<Box<dyn Strategy>> {
        let input = input.trim();
        let relay = self.config.relay_base.as_ref();
        let mut strategies: Vec<Box<dyn Strategy>> = Vec::new();

        match SourceRef::resolve(input) {
            Ok(source) => {
                strategies.push(Box::new(GvizStrategy::new(
                    &self.config.sheets_base,
                    &source,
                    self.fetcher.clone(),
                    self.slot.clone(),
                    self.config.channel_timeout,
                )));
                for url in candidate_csv_urls(&self.config.sheets_base, &source) {
                    strategies.push(Box::new(CsvStrategy::new(
                        Step::ProxiedCsv,
                        url,
                        relay,
                        self.fetcher.clone(),
                    )));
                }
            }
            Err(reason) => reel_info!("{reason}; only the direct relay applies"),
        }

        strategies.push(Box::new(CsvStrategy::new(
            Step::DirectProxied,
            input,
            relay,
            self.fetcher.clone(),
        )));
        strategies
    }

    pub async fn load_table(
        &self,
        request_id: RequestId,
        input: &str,
        sink: &dyn ProgressSink,
    ) -> Result<RawTable, LoadError> {
        let strategies = self.plan(input);
        run_strategies(request_id, &strategies, sink, self.config.error_detail_limit).await
    }

    /// Fetch and assemble in one go.
    pub async fn load_records(
        &self,
        request_id: RequestId,
        input: &str,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<DomainRecord>, LoadError> {
        let table = self.load_table(request_id, input, sink).await?;
        let records = assemble(&table);
        if records.is_empty() {
            reel_warn!("request {request_id}: no complete records in {} row(s)", table.len());
        }
        Ok(records)
    }
}
