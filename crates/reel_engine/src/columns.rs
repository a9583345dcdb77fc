//! Header resolution: maps export headers onto the semantic fields the
//! assembler reads, tolerating renamed or decorated column names.

/// Semantic fields read from an analytics export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    EventName,
    ParamKey,
    ParamValue,
    Timestamp,
    Country,
    SubscriptionStatus,
    UserId,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::EventName,
        Field::ParamKey,
        Field::ParamValue,
        Field::Timestamp,
        Field::Country,
        Field::SubscriptionStatus,
        Field::UserId,
    ];

    /// Accepted header names, in priority order.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Field::EventName => &["event_name"],
            Field::ParamKey => &["event_params.key"],
            Field::ParamValue => &["event_params.value.string_value"],
            Field::Timestamp => &["event_timestamp"],
            Field::Country => &["geo.country", "geo_country", "country"],
            Field::SubscriptionStatus => &["subscription_status"],
            Field::UserId => &["user_pseudo_id", "user_pseudoid"],
        }
    }
}

/// Cell offsets for each semantic field; `None` means the field is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    pub event_name: Option<usize>,
    pub param_key: Option<usize>,
    pub param_value: Option<usize>,
    pub timestamp: Option<usize>,
    pub country: Option<usize>,
    pub subscription_status: Option<usize>,
    pub user_id: Option<usize>,
}

impl ColumnIndex {
    pub fn resolve<S: AsRef<str>>(header: &[S]) -> Self {
        Self::resolve_with(header, Field::candidates)
    }

    /// Resolve using a caller-supplied candidate table.
    pub fn resolve_with<S, F>(header: &[S], candidates: F) -> Self
    where
        S: AsRef<str>,
        F: Fn(Field) -> &'static [&'static str],
    {
        let normalized: Vec<String> = header
            .iter()
            .map(|cell| normalize_header(cell.as_ref()))
            .collect();
        let mut index = Self::default();
        for field in Field::ALL {
            *index.slot_mut(field) = find_normalized(&normalized, candidates(field));
        }
        index
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        match field {
            Field::EventName => self.event_name,
            Field::ParamKey => self.param_key,
            Field::ParamValue => self.param_value,
            Field::Timestamp => self.timestamp,
            Field::Country => self.country,
            Field::SubscriptionStatus => self.subscription_status,
            Field::UserId => self.user_id,
        }
    }

    /// True when event name, parameter key and parameter value all resolved.
    pub fn has_classification(&self) -> bool {
        self.event_name.is_some() && self.param_key.is_some() && self.param_value.is_some()
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<usize> {
        match field {
            Field::EventName => &mut self.event_name,
            Field::ParamKey => &mut self.param_key,
            Field::ParamValue => &mut self.param_value,
            Field::Timestamp => &mut self.timestamp,
            Field::Country => &mut self.country,
            Field::SubscriptionStatus => &mut self.subscription_status,
            Field::UserId => &mut self.user_id,
        }
    }
}

/// Lowercase, trim, and collapse each whitespace run to a single `_`.
pub fn normalize_header(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Find the header offset matching any candidate.
///
/// Exact matches are tried first, candidate by candidate. Failing that, the
/// first header containing any candidate wins; for containment `.` and `_`
/// are interchangeable so dotted names match flattened exports.
pub fn find_column<S: AsRef<str>>(header: &[S], candidates: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = header
        .iter()
        .map(|cell| normalize_header(cell.as_ref()))
        .collect();
    find_normalized(&normalized, candidates)
}

fn find_normalized(normalized: &[String], candidates: &[&str]) -> Option<usize> {
    let targets: Vec<String> = candidates.iter().map(|c| normalize_header(c)).collect();

    for target in &targets {
        if let Some(exact) = normalized.iter().position(|cell| cell == target) {
            return Some(exact);
        }
    }

    let loose_targets: Vec<String> = targets
        .iter()
        .filter(|target| !target.is_empty())
        .map(|target| loosen(target))
        .collect();
    normalized.iter().position(|cell| {
        let cell = loosen(cell);
        loose_targets.iter().any(|target| cell.contains(target.as_str()))
    })
}

fn loosen(name: &str) -> String {
    name.replace('.', "_")
}
