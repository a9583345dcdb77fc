use crate::{ActiveFilters, DomainRecord, FilterKind, RequestId};

pub const DEFAULT_PAGE_SIZE: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading { request_id: RequestId },
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    input: String,
    records: Vec<DomainRecord>,
    /// Offsets into `records` passing the active filters, in record order.
    visible: Vec<usize>,
    filters: ActiveFilters,
    /// 1-based.
    page: usize,
    page_size: usize,
    /// Offset into `visible`.
    selected: Option<usize>,
    status: LoadStatus,
    next_request_id: RequestId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            input: String::new(),
            records: Vec::new(),
            visible: Vec::new(),
            filters: ActiveFilters::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            selected: None,
            status: LoadStatus::Idle,
            next_request_id: 1,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn records(&self) -> &[DomainRecord] {
        &self.records
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &DomainRecord> + '_ {
        self.visible.iter().map(|&i| &self.records[i])
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn filters(&self) -> &ActiveFilters {
        &self.filters
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(self.page_size)
    }

    /// Visible records on the current page.
    pub fn page_records(&self) -> impl Iterator<Item = (usize, &DomainRecord)> + '_ {
        let start = (self.page - 1) * self.page_size;
        self.visible
            .iter()
            .enumerate()
            .skip(start)
            .take(self.page_size)
            .map(|(offset, &i)| (offset, &self.records[i]))
    }

    pub fn selected_offset(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&DomainRecord> {
        self.selected.map(|offset| &self.records[self.visible[offset]])
    }

    /// Returns and clears the "needs render" flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn set_input(&mut self, input: String) {
        if self.input != input {
            self.input = input;
            self.dirty = true;
        }
    }

    /// Start a load of the trimmed input. An empty input records an error
    /// instead.
    pub(crate) fn begin_load(&mut self) -> Option<(RequestId, String)> {
        self.dirty = true;
        let url = self.input.trim().to_string();
        if url.is_empty() {
            self.status = LoadStatus::Failed("missing sheet URL".to_string());
            return None;
        }
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.status = LoadStatus::Loading { request_id };
        Some((request_id, url))
    }

    /// Apply a completed load. Completions for anything but the load in
    /// flight are stale and ignored.
    pub(crate) fn finish_load(
        &mut self,
        request_id: RequestId,
        result: Result<Vec<DomainRecord>, String>,
    ) -> bool {
        if self.status != (LoadStatus::Loading { request_id }) {
            return false;
        }
        match result {
            Ok(records) => {
                self.records = records;
                self.selected = None;
                self.status = LoadStatus::Loaded;
                self.refilter();
            }
            Err(message) => {
                self.status = LoadStatus::Failed(message);
            }
        }
        self.dirty = true;
        true
    }

    pub(crate) fn toggle_filter(&mut self, kind: FilterKind, value: String) {
        self.filters.toggle(kind, value);
        self.refilter();
    }

    pub(crate) fn remove_filter(&mut self, kind: FilterKind, value: &str) {
        if self.filters.remove(kind, value) {
            self.refilter();
        }
    }

    pub(crate) fn clear_filter(&mut self, kind: FilterKind) {
        if self.filters.clear(kind) {
            self.refilter();
        }
    }

    pub(crate) fn go_to_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() || page == self.page {
            return false;
        }
        self.page = page;
        self.dirty = true;
        true
    }

    pub(crate) fn set_page_size(&mut self, page_size: usize) {
        if page_size == 0 {
            return;
        }
        self.page_size = page_size;
        self.page = 1;
        self.dirty = true;
    }

    pub(crate) fn select_id(&mut self, id: usize) -> bool {
        let Some(offset) = self.visible.iter().position(|&i| self.records[i].id == id) else {
            return false;
        };
        self.selected = Some(offset);
        self.dirty = true;
        true
    }

    /// Move the selection, starting from the first card of the current page
    /// when nothing is selected, clamped to the visible range. Crossing a
    /// page boundary switches pages.
    pub(crate) fn select_offset(&mut self, delta: isize) -> bool {
        if self.visible.is_empty() {
            return false;
        }
        let origin = self
            .selected
            .unwrap_or((self.page - 1) * self.page_size);
        let last = self.visible.len() - 1;
        let target = origin.saturating_add_signed(delta).min(last);
        self.page = target / self.page_size + 1;
        self.selected = Some(target);
        self.dirty = true;
        true
    }

    /// Recompute the visible set and return to page 1, keeping the selected
    /// record selected if it is still visible.
    fn refilter(&mut self) {
        let selected_id = self.selected_record().map(|record| record.id);
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.filters.matches(record))
            .map(|(i, _)| i)
            .collect();
        self.selected = selected_id
            .and_then(|id| self.visible.iter().position(|&i| self.records[i].id == id));
        self.page = 1;
        self.dirty = true;
    }
}
