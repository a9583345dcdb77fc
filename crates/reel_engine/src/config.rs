use std::time::Duration;

use url::Url;

use crate::fetch::FetchSettings;

pub const DEFAULT_SHEETS_BASE: &str = "https://docs.google.com";
pub const DEFAULT_CHANNEL_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_ERROR_DETAIL_LIMIT: usize = 800;

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Scheme and host serving `/spreadsheets/d/<id>/...`.
    pub sheets_base: Url,
    /// Root of the fetch relay. `None` fetches export URLs directly.
    pub relay_base: Option<Url>,
    /// Hard limit for the structured-data channel.
    pub channel_timeout: Duration,
    /// Upper bound, in characters, of the serialized failure list.
    pub error_detail_limit: usize,
    pub fetch: FetchSettings,
}

impl LoaderConfig {
    pub fn with_relay(mut self, relay_base: Url) -> Self {
        self.relay_base = Some(relay_base);
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sheets_base: Url::parse(DEFAULT_SHEETS_BASE).expect("default sheets base is a valid URL"),
            relay_base: None,
            channel_timeout: DEFAULT_CHANNEL_TIMEOUT,
            error_detail_limit: DEFAULT_ERROR_DETAIL_LIMIT,
            fetch: FetchSettings::default(),
        }
    }
}
