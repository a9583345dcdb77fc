use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::oneshot;
use url::Url;

use crate::decode::decode_text;
use crate::fetch::Fetcher;
use crate::locate::query_value;
use crate::slot::ResponseSlot;
use crate::strategy::{looks_like_html, Step, Strategy, StrategyError};
use crate::{RawTable, Row, SourceRef};

const CALLBACK_MARKER: &str = "setResponse(";

/// Query-channel JSON endpoint for one document tab.
pub fn gviz_json_url(base: &Url, source: &SourceRef) -> String {
    let root = base.as_str().trim_end_matches('/');
    let id = &source.document_id;
    if source.tab_id.is_empty() {
        format!("{root}/spreadsheets/d/{id}/gviz/tq?tqx=out:json")
    } else {
        let tab = query_value(&source.tab_id);
        format!("{root}/spreadsheets/d/{id}/gviz/tq?gid={tab}&tqx=out:json")
    }
}

/// Pull the JSON argument out of a `google.visualization.Query.setResponse(...)`
/// response. `Ok(None)` means the response never invokes the callback.
pub fn extract_payload(body: &str) -> Result<Option<Value>, StrategyError> {
    let Some(start) = body.find(CALLBACK_MARKER) else {
        return Ok(None);
    };
    let args = &body[start + CALLBACK_MARKER.len()..];
    let Some(end) = args.rfind(')') else {
        return Err(StrategyError::ScriptLoadFailure(
            "unterminated response callback".into(),
        ));
    };
    serde_json::from_str(args[..end].trim())
        .map(Some)
        .map_err(|err| StrategyError::ScriptLoadFailure(format!("malformed payload: {err}")))
}

/// Convert a query-channel response into rows, header first.
///
/// Returns an empty table when the payload carries no `table`.
pub fn table_from_response(response: &Value) -> RawTable {
    let Some(table) = response.get("table") else {
        return RawTable::default();
    };

    let header: Row = array(table, "cols")
        .iter()
        .map(|col| first_text(col, &["label", "id"]).unwrap_or_default())
        .collect();

    let mut rows = vec![header];
    for row in array(table, "rows") {
        rows.push(array(row, "c").iter().map(cell_text).collect());
    }
    RawTable::new(rows)
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// Formatted value `f` wins over raw value `v`; null cells are empty.
fn cell_text(cell: &Value) -> String {
    ["f", "v"]
        .iter()
        .filter_map(|key| cell.get(*key))
        .find(|value| !value.is_null())
        .map(scalar_text)
        .unwrap_or_default()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e15 => {
                (float as i64).to_string()
            }
            _ => number.to_string(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Structured-data channel: fetch the query response, route its payload
/// through the [`ResponseSlot`] and wait for the handler under a hard timeout.
pub struct GvizStrategy {
    url: String,
    fetcher: Arc<dyn Fetcher>,
    slot: Arc<ResponseSlot>,
    timeout: Duration,
}

impl GvizStrategy {
    pub fn new(
        base: &Url,
        source: &SourceRef,
        fetcher: Arc<dyn Fetcher>,
        slot: Arc<ResponseSlot>,
        timeout: Duration,
    ) -> Self {
        Self {
            url: gviz_json_url(base, source),
            fetcher,
            slot,
            timeout,
        }
    }

    async fn load_and_wait(&self, rx: oneshot::Receiver<Value>) -> Result<Value, StrategyError> {
        let output = self
            .fetcher
            .fetch(&self.url)
            .await
            .map_err(|err| StrategyError::ScriptLoadFailure(err.to_string()))?;
        let body = decode_text(&output.bytes, output.metadata.content_type.as_deref());
        match extract_payload(&body)? {
            Some(payload) => {
                self.slot.dispatch(payload);
            }
            // Sign-in pages never call back.
            None if looks_like_html(&body) => {
                return Err(StrategyError::ScriptLoadFailure(
                    "HTML page instead of query response".into(),
                ));
            }
            None => reel_logging::reel_debug!("response from {} never invoked the callback", self.url),
        }
        rx.await
            .map_err(|_| StrategyError::ScriptLoadFailure("response handler dropped".into()))
    }
}

#[async_trait::async_trait]
impl Strategy for GvizStrategy {
    fn step(&self) -> Step {
        Step::GvizJsonp
    }

    fn target_url(&self) -> Option<&str> {
        Some(&self.url)
    }

    async fn attempt(&self) -> Result<RawTable, StrategyError> {
        let (tx, rx) = oneshot::channel();
        let tx = Mutex::new(Some(tx));
        let token = self.slot.register(Arc::new(move |payload: Value| {
            let sender = tx
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();
            if let Some(sender) = sender {
                let _ = sender.send(payload);
            }
        }));

        let outcome = tokio::time::timeout(self.timeout, self.load_and_wait(rx)).await;
        self.slot.restore(token);

        let payload = outcome.map_err(|_| StrategyError::ChannelTimeout {
            millis: self.timeout.as_millis() as u64,
        })??;
        let table = table_from_response(&payload);
        if table.is_empty() {
            return Err(StrategyError::EmptyResult);
        }
        Ok(table)
    }
}
