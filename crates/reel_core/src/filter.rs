use std::collections::{BTreeMap, BTreeSet};

use crate::DomainRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKind {
    Country,
    Category,
    Style,
    Subscription,
    User,
}

impl FilterKind {
    pub const ALL: [FilterKind; 5] = [
        FilterKind::Country,
        FilterKind::Category,
        FilterKind::Style,
        FilterKind::Subscription,
        FilterKind::User,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterKind::Country => "country",
            FilterKind::Category => "category",
            FilterKind::Style => "style",
            FilterKind::Subscription => "subscription",
            FilterKind::User => "user",
        }
    }

    pub fn value_of(self, record: &DomainRecord) -> &str {
        match self {
            FilterKind::Country => &record.country,
            FilterKind::Category => &record.category_name,
            FilterKind::Style => &record.style_name,
            FilterKind::Subscription => &record.subscription_status,
            FilterKind::User => &record.user_id,
        }
    }
}

/// Multi-select filters. An empty selection for a kind admits every record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActiveFilters {
    selected: BTreeMap<FilterKind, BTreeSet<String>>,
}

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip `value` in or out of the selection; returns whether it is now selected.
    pub fn toggle(&mut self, kind: FilterKind, value: impl Into<String>) -> bool {
        let value = value.into();
        let set = self.selected.entry(kind).or_default();
        if set.remove(&value) {
            if set.is_empty() {
                self.selected.remove(&kind);
            }
            false
        } else {
            set.insert(value);
            true
        }
    }

    pub fn remove(&mut self, kind: FilterKind, value: &str) -> bool {
        let Some(set) = self.selected.get_mut(&kind) else {
            return false;
        };
        let removed = set.remove(value);
        if set.is_empty() {
            self.selected.remove(&kind);
        }
        removed
    }

    pub fn clear(&mut self, kind: FilterKind) -> bool {
        self.selected.remove(&kind).is_some()
    }

    pub fn is_selected(&self, kind: FilterKind, value: &str) -> bool {
        self.selected
            .get(&kind)
            .is_some_and(|set| set.contains(value))
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn matches(&self, record: &DomainRecord) -> bool {
        self.selected
            .iter()
            .all(|(kind, values)| values.contains(kind.value_of(record)))
    }

    /// Active `(kind, value)` pairs in kind order, then value order.
    pub fn entries(&self) -> impl Iterator<Item = (FilterKind, &str)> + '_ {
        self.selected
            .iter()
            .flat_map(|(kind, values)| values.iter().map(move |value| (*kind, value.as_str())))
    }
}

/// Distinct non-empty values of `kind`, sorted.
pub fn facet_values(records: &[DomainRecord], kind: FilterKind) -> Vec<String> {
    records
        .iter()
        .map(|record| kind.value_of(record))
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
