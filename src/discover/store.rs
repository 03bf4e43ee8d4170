//! Filtered result store
//!
//! Holds the last-applied filter object and its own pagination cursor,
//! decoupled from the primary list cursor so that filtered browsing and
//! primary-list browsing coexist without clobbering each other.

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::watch;

use super::DiscoverFilters;
use crate::constants::FIRST_PAGE;
use crate::error::ApiError;
use crate::remote::types::Page;

/// Per-entity adapter supplying the search and discover endpoints
#[async_trait]
pub trait DiscoverSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    async fn search(&self, query: &str, page: u32) -> Result<Page<Self::Item>, ApiError>;

    async fn discover(
        &self,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<Page<Self::Item>, ApiError>;
}

/// Observable state of the filtered result set
#[derive(Debug, Clone)]
pub struct FilterState<T> {
    pub filters: DiscoverFilters,
    pub results: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<String>,
    pub has_active_filters: bool,
}

impl<T> Default for FilterState<T> {
    fn default() -> Self {
        Self {
            filters: DiscoverFilters::default(),
            results: Vec::new(),
            current_page: FIRST_PAGE,
            total_pages: 1,
            total_results: 0,
            loading: false,
            loading_more: false,
            error: None,
            has_active_filters: false,
        }
    }
}

/// Discovery/filter controller with an independent pagination cursor
pub struct FilterStore<S: DiscoverSource> {
    source: S,
    state: RwLock<FilterState<S::Item>>,
    changed: watch::Sender<u64>,
}

impl<S: DiscoverSource> FilterStore<S> {
    pub fn new(source: S) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            source,
            state: RwLock::new(FilterState::default()),
            changed,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FilterState<S::Item> {
        self.state.read().clone()
    }

    /// Subscribe to change notifications (generation counter)
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    fn notify(&self) {
        self.changed.send_modify(|generation| *generation += 1);
    }

    /// Apply a filter object, resetting the cursor and replacing the
    /// result set. Inactive filters clear the results without any
    /// remote call.
    pub async fn apply(&self, filters: DiscoverFilters) -> Result<(), ApiError> {
        let active = filters.is_active();

        {
            let mut state = self.state.write();
            state.has_active_filters = active;
            state.filters = filters.clone();
            if !active {
                state.results.clear();
                state.current_page = FIRST_PAGE;
                state.total_pages = 1;
                state.total_results = 0;
            } else {
                state.current_page = FIRST_PAGE;
                state.results.clear();
                state.loading = true;
                state.error = None;
            }
        }
        self.notify();

        if !active {
            return Ok(());
        }

        match self.fetch_page(&filters, FIRST_PAGE).await {
            Ok(page) => {
                let mut state = self.state.write();
                state.results = page.results;
                state.current_page = page.page;
                state.total_pages = page.total_pages;
                state.total_results = page.total_results;
                state.loading = false;
                drop(state);
                self.notify();
                Ok(())
            }
            Err(err) => {
                let mut state = self.state.write();
                state.error = Some(err.to_string());
                state.loading = false;
                drop(state);
                self.notify();
                Err(err)
            }
        }
    }

    /// Fetch the next filtered page and append. Silent no-op while a
    /// load is running, past the last page, or with no active filters.
    /// On failure the cursor increment is rolled back.
    pub async fn load_more(&self) -> Result<(), ApiError> {
        let (filters, next_page) = {
            let mut state = self.state.write();
            if state.loading || state.loading_more {
                return Ok(());
            }
            if state.current_page >= state.total_pages {
                return Ok(());
            }
            if !state.has_active_filters {
                return Ok(());
            }
            state.loading_more = true;
            state.current_page += 1;
            (state.filters.clone(), state.current_page)
        };
        self.notify();

        match self.fetch_page(&filters, next_page).await {
            Ok(page) => {
                let mut state = self.state.write();
                state.results.extend(page.results);
                state.current_page = page.page;
                state.total_pages = page.total_pages;
                state.total_results = page.total_results;
                state.loading_more = false;
                drop(state);
                self.notify();
                Ok(())
            }
            Err(err) => {
                let mut state = self.state.write();
                // Roll back so retries resume from the last good page
                state.current_page -= 1;
                state.loading_more = false;
                state.error = Some(err.to_string());
                drop(state);
                self.notify();
                Err(err)
            }
        }
    }

    /// Clear filters and results; back to the inactive state
    pub fn clear(&self) {
        let mut state = self.state.write();
        *state = FilterState::default();
        drop(state);
        self.notify();
    }

    /// Free-text query takes precedence over structured filters: the
    /// backend cannot combine them, so search wins and the rest of the
    /// filter object is ignored
    async fn fetch_page(
        &self,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<Page<S::Item>, ApiError> {
        match filters.query_text() {
            Some(query) => self.source.search(query, page).await,
            None => self.source.discover(filters, page).await,
        }
    }
}

impl<S: DiscoverSource> std::fmt::Debug for FilterStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("FilterStore")
            .field("has_active_filters", &state.has_active_filters)
            .field("current_page", &state.current_page)
            .field("total_pages", &state.total_pages)
            .finish()
    }
}
