//! Per-panel query state
//!
//! Every table or chart panel owns its own page, page size, sort and
//! filters. Any change to filters, sort or page size sends the panel back
//! to page 1, and the page is always kept inside the known result range:
//! `page * page_size <= total + page_size`.
//!
//! All panels paginate server-side through [`PanelQuery::to_list_query`].

use city_client::{ClientError, ClientResult, ListQuery, SortOrder};
use shared::Paged;
use shared::response::total_pages;
use std::collections::BTreeMap;

/// Allowed page sizes of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizeBounds {
    pub min: u32,
    pub max: u32,
}

impl PageSizeBounds {
    /// Issues list
    pub const ISSUES: Self = Self { min: 5, max: 50 };
    pub const DEFAULT: Self = Self { min: 1, max: 100 };

    pub fn clamp(&self, size: u32) -> u32 {
        size.clamp(self.min, self.max)
    }
}

impl Default for PageSizeBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Page, sort and filter state of one panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelQuery {
    page: u32,
    page_size: u32,
    sort_by: Option<String>,
    sort_order: SortOrder,
    filters: BTreeMap<String, String>,
    bounds: PageSizeBounds,
}

impl PanelQuery {
    pub fn new(page_size: u32, bounds: PageSizeBounds) -> Self {
        Self {
            page: 1,
            page_size: bounds.clamp(page_size),
            sort_by: None,
            sort_order: SortOrder::default(),
            filters: BTreeMap::new(),
            bounds,
        }
    }

    /// Issues list panel: 10 per page, sizes 5..=50
    pub fn issues() -> Self {
        Self::new(10, PageSizeBounds::ISSUES)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn filter(&self, field: &str) -> Option<&str> {
        self.filters.get(field).map(String::as_str)
    }

    /// Set a filter; an empty value removes it
    pub fn set_filter(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        if value.trim().is_empty() {
            self.filters.remove(&field);
        } else {
            self.filters.insert(field, value);
        }
        self.page = 1;
    }

    pub fn remove_filter(&mut self, field: &str) {
        self.filters.remove(field);
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.page = 1;
    }

    pub fn set_sort(&mut self, field: impl Into<String>, order: SortOrder) {
        self.sort_by = Some(field.into());
        self.sort_order = order;
        self.page = 1;
    }

    /// Column-header click: same column flips direction, a new column starts ascending
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort_by.as_deref() == Some(field) {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_by = Some(field.to_string());
            self.sort_order = SortOrder::Asc;
        }
        self.page = 1;
    }

    pub fn set_page_size(&mut self, size: u32) {
        self.page_size = self.bounds.clamp(size);
        self.page = 1;
    }

    /// Last valid page for `total` results
    pub fn last_page(&self, total: u64) -> u32 {
        total_pages(total, self.page_size)
    }

    /// Jump to `page`, clamped to `1..=last_page(total)`
    pub fn go_to(&mut self, page: u32, total: u64) {
        self.page = page.clamp(1, self.last_page(total));
    }

    pub fn next_page(&mut self, total: u64) {
        self.go_to(self.page.saturating_add(1), total);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Pull the page back into range after the total shrank
    pub fn clamp_to_total(&mut self, total: u64) {
        self.page = self.page.min(self.last_page(total)).max(1);
    }

    pub fn has_next(&self, total: u64) -> bool {
        self.page < self.last_page(total)
    }

    /// Zero-based index of the first row on the current page
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Server-side query for the current state
    pub fn to_list_query(&self) -> ListQuery {
        let mut query = ListQuery::all().paginate(self.page, self.page_size);
        if let Some(field) = &self.sort_by {
            query = query.order_by(field.clone(), self.sort_order);
        }
        for (field, value) in &self.filters {
            query = query.filter(field.clone(), value.clone());
        }
        query
    }
}

impl Default for PanelQuery {
    fn default() -> Self {
        Self::new(10, PageSizeBounds::DEFAULT)
    }
}

/// Walk a paginated endpoint until `total` items have arrived
///
/// `fetch` receives `(page, limit)`. Stops early on an empty page so a
/// backend that overstates `total` cannot loop forever.
pub async fn collect_all_pages<T, F, Fut>(page_size: u32, mut fetch: F) -> ClientResult<Vec<T>>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = ClientResult<Paged<T>>>,
{
    let page_size = page_size.max(1);
    let mut items = Vec::new();
    let mut page = 1;
    loop {
        let batch = fetch(page, page_size).await?;
        let received = batch.items.len();
        items.extend(batch.items);
        if received == 0 || items.len() as u64 >= batch.total {
            break;
        }
        page += 1;
    }
    Ok(items)
}

/// Ticket handed out when a load starts; only the newest ticket may land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Query state plus the latest result of one panel
#[derive(Debug)]
pub struct PanelState<T> {
    pub query: PanelQuery,
    data: Option<Paged<T>>,
    loading: bool,
    error: Option<String>,
    generation: u64,
    needs_reload: bool,
}

impl<T> PanelState<T> {
    pub fn new(query: PanelQuery) -> Self {
        Self {
            query,
            data: None,
            loading: false,
            error: None,
            generation: 0,
            needs_reload: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn data(&self) -> Option<&Paged<T>> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The landed page fell outside the new total and the page was pulled
    /// back; `data` belongs to the old page until the caller fetches again
    pub fn needs_reload(&self) -> bool {
        self.needs_reload
    }

    /// Mark a load as in flight; earlier tickets become stale
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        self.needs_reload = false;
        LoadTicket(self.generation)
    }

    /// Land a result. Returns false and drops it when `ticket` is stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Paged<T>, ClientError>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(ticket = ticket.0, current = self.generation, "dropping stale panel response");
            return false;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                let requested = self.query.page();
                self.query.clamp_to_total(page.total);
                self.needs_reload = self.query.page() != requested;
                if self.needs_reload {
                    tracing::debug!(requested, page = self.query.page(), "page out of range, reload needed");
                }
                self.error = None;
                self.data = Some(page);
            }
            Err(err) => {
                tracing::warn!(error = %err, "panel load failed");
                self.error = Some(err.user_message());
            }
        }
        true
    }
}

impl<T> Default for PanelState<T> {
    fn default() -> Self {
        Self::new(PanelQuery::default())
    }
}
