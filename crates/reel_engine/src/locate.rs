use url::{form_urlencoded, Url};

use crate::strategy::StrategyError;
use crate::SourceRef;

const DOCUMENT_MARKER: &str = "/d/";
const TAB_KEY: &str = "gid";
const TAB_MARKER: &str = "gid=";

impl SourceRef {
    /// Extract document and tab identifiers from a sheet URL.
    ///
    /// Returns `None` when the input is not an absolute URL or carries no
    /// `/d/<id>` path segment; callers then treat the input as an opaque,
    /// directly fetchable URL.
    pub fn parse(input: &str) -> Option<Self> {
        let url = Url::parse(input.trim()).ok()?;
        let document_id = url
            .path()
            .split(DOCUMENT_MARKER)
            .nth(1)?
            .split('/')
            .next()
            .filter(|id| !id.is_empty())?
            .to_string();
        let tab_id = tab_from_query(&url)
            .or_else(|| tab_from_fragment(&url))
            .unwrap_or_default();
        Some(Self {
            document_id,
            tab_id,
        })
    }

    /// Like [`SourceRef::parse`], but names the rejected input.
    pub fn resolve(input: &str) -> Result<Self, StrategyError> {
        Self::parse(input).ok_or_else(|| StrategyError::InvalidSource(input.trim().to_string()))
    }

    pub fn tab_or_default(&self) -> &str {
        if self.tab_id.is_empty() {
            "0"
        } else {
            &self.tab_id
        }
    }
}

fn tab_from_query(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == TAB_KEY)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn tab_from_fragment(url: &Url) -> Option<String> {
    let fragment = url.fragment()?;
    let rest = fragment.split(TAB_MARKER).nth(1)?;
    let value = rest.split('&').next().unwrap_or(rest);
    (!value.is_empty()).then(|| value.to_string())
}

/// Form-encode one query value; tab ids arrive query-decoded.
pub(crate) fn query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
