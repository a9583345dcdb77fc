use chrono::DateTime;

use crate::{AppState, DomainRecord, FilterKind, LoadStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub loading: bool,
    pub error: Option<String>,
    pub total_records: usize,
    pub visible_records: usize,
    pub count_label: String,
    pub page: usize,
    pub total_pages: usize,
    /// `"<page>/<max(total, 1)>"`.
    pub page_info: String,
    pub can_prev: bool,
    pub can_next: bool,
    pub page_size: usize,
    pub cards: Vec<CardView>,
    pub active_filters: Vec<FilterPill>,
    pub preview: Option<PreviewView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: usize,
    /// Offset within the filtered set.
    pub position: usize,
    pub style: String,
    pub category: String,
    pub country: String,
    pub user: String,
    pub status: String,
    pub cancelled: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPill {
    pub kind: FilterKind,
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewView {
    pub id: usize,
    pub input1_url: Option<String>,
    pub input2_url: Option<String>,
    pub output_url: String,
    pub style: String,
    pub category: String,
    pub timestamp: String,
    pub country: String,
    pub subscription_status: String,
    pub user_id: String,
}

impl AppState {
    pub fn view(&self) -> AppViewModel {
        let (loading, error) = match self.status() {
            LoadStatus::Loading { .. } => (true, None),
            LoadStatus::Failed(message) => (false, Some(message.clone())),
            LoadStatus::Idle | LoadStatus::Loaded => (false, None),
        };
        let total_pages = self.total_pages();
        let selected = self.selected_offset();

        AppViewModel {
            input: self.input().to_string(),
            loading,
            error,
            total_records: self.records().len(),
            visible_records: self.visible_count(),
            count_label: format!("{} records", self.visible_count()),
            page: self.page(),
            total_pages,
            page_info: format!("{}/{}", self.page(), total_pages.max(1)),
            can_prev: self.page() > 1,
            can_next: self.page() < total_pages,
            page_size: self.page_size(),
            cards: self
                .page_records()
                .map(|(position, record)| CardView::new(record, position, selected == Some(position)))
                .collect(),
            active_filters: self
                .filters()
                .entries()
                .map(|(kind, value)| FilterPill {
                    kind,
                    value: value.to_string(),
                    label: format!("{}: {value}", kind.label()),
                })
                .collect(),
            preview: self.selected_record().map(PreviewView::new),
            dirty: self.is_dirty(),
        }
    }
}

impl CardView {
    fn new(record: &DomainRecord, position: usize, selected: bool) -> Self {
        Self {
            id: record.id,
            position,
            style: or_placeholder(&record.style_name, "Unknown Style"),
            category: or_placeholder(&record.category_name, "Unknown Category"),
            country: or_placeholder(&record.country, "Unknown Country"),
            user: or_placeholder(&record.user_id, "Unknown User"),
            status: or_placeholder(&record.subscription_status, "Unknown Status"),
            cancelled: record
                .subscription_status
                .to_lowercase()
                .contains("cancelled"),
            selected,
        }
    }
}

impl PreviewView {
    fn new(record: &DomainRecord) -> Self {
        let input1 = record.input1_url.as_deref().filter(|url| is_displayable(url));
        let input2 = record
            .input2_url
            .as_deref()
            .filter(|url| is_displayable(url) && Some(*url) != record.input1_url.as_deref());

        Self {
            id: record.id,
            input1_url: input1.map(str::to_string),
            input2_url: input2.map(str::to_string),
            output_url: record.output_url.clone(),
            style: record.style_name.clone(),
            category: record.category_name.clone(),
            timestamp: format_timestamp(&record.timestamp),
            country: record.country.clone(),
            subscription_status: record.subscription_status.clone(),
            user_id: record.user_id.clone(),
        }
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn is_displayable(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && url != "null" && url != "undefined"
}

/// Render a numeric timestamp (milliseconds since the epoch) as UTC
/// `YYYY-MM-DD HH:MM:SS`. Anything else is returned as is.
pub fn format_timestamp(raw: &str) -> String {
    let Ok(value) = raw.trim().parse::<f64>() else {
        return raw.to_string();
    };
    if !value.is_finite() {
        return raw.to_string();
    }
    DateTime::from_timestamp_millis(value.round() as i64)
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}
