//! Paged list engine
//!
//! One generic pagination controller shared by every entity catalog.
//! The list kinds are mutually exclusive and share a single cursor:
//! switching kind resets to page 1 and clears prior results, and
//! load-more only applies to the active kind.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::cache::{key, CacheStore};
use crate::constants::FIRST_PAGE;
use crate::error::ApiError;
use crate::remote::types::Page;

/// The mutually-exclusive category of a primary browsing list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListKind {
    Popular,
    NowPlaying,
    TopRated,
    Search { query: String },
}

impl ListKind {
    /// Default cache key namespace for this kind
    pub fn default_namespace(&self) -> String {
        match self {
            ListKind::Popular => "popular".to_string(),
            ListKind::NowPlaying => "nowPlaying".to_string(),
            ListKind::TopRated => "topRated".to_string(),
            ListKind::Search { query } => key::search_namespace(query),
        }
    }
}

/// Per-entity adapter supplying the paged list endpoints
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Cache key namespace for a kind; override when the entity names a
    /// kind differently (TV calls its now-playing list `onTheAir`)
    fn namespace(&self, kind: &ListKind) -> String {
        kind.default_namespace()
    }

    /// Fetch one page of the given list kind from the remote catalog
    async fn fetch_page(&self, kind: &ListKind, page: u32) -> Result<Page<Self::Item>, ApiError>;
}

/// Observable state of a paged list
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
    pub kind: Option<ListKind>,
    pub has_attempted_fetch: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            loading_more: false,
            error: None,
            current_page: FIRST_PAGE,
            total_pages: 1,
            kind: None,
            has_attempted_fetch: false,
        }
    }
}

/// Pagination controller for one entity's primary lists
pub struct ListStore<S: ListSource> {
    source: S,
    cache: Arc<CacheStore>,
    state: RwLock<ListState<S::Item>>,
    changed: watch::Sender<u64>,
}

impl<S: ListSource> ListStore<S> {
    pub fn new(source: S, cache: Arc<CacheStore>) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            source,
            cache,
            state: RwLock::new(ListState::default()),
            changed,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ListState<S::Item> {
        self.state.read().clone()
    }

    /// Subscribe to change notifications (generation counter)
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    fn notify(&self) {
        self.changed.send_modify(|generation| *generation += 1);
    }

    /// Switch to `kind` and load its first page.
    ///
    /// An empty or whitespace-only search query is treated as "no
    /// search": results are cleared silently with no cache or network
    /// interaction. When fresh page-1 results and the cached total-page
    /// count are both available the controller adopts them without a
    /// network round trip.
    pub async fn load(&self, kind: ListKind) -> Result<(), ApiError> {
        if let ListKind::Search { query } = &kind {
            if query.trim().is_empty() {
                let mut state = self.state.write();
                state.items.clear();
                state.loading = false;
                state.has_attempted_fetch = false;
                drop(state);
                self.notify();
                return Ok(());
            }
        }

        let namespace = self.source.namespace(&kind);

        {
            let mut state = self.state.write();
            state.has_attempted_fetch = true;
            state.kind = Some(kind.clone());
            state.current_page = FIRST_PAGE;
        }
        self.notify();

        // Cache-first: adopt fresh page-1 results without a round trip
        let cached_items = self
            .cache
            .get::<Vec<S::Item>>(&key::page(&namespace, FIRST_PAGE));
        let cached_total = self.cache.get::<u32>(&key::total_pages(&namespace));
        if let (Some(items), Some(total_pages)) = (cached_items, cached_total) {
            let mut state = self.state.write();
            state.items = items;
            state.total_pages = total_pages;
            state.loading = false;
            state.error = None;
            drop(state);
            self.notify();
            return Ok(());
        }

        {
            let mut state = self.state.write();
            state.loading = true;
            state.items.clear();
            state.error = None;
        }
        self.notify();

        match self.source.fetch_page(&kind, FIRST_PAGE).await {
            Ok(page) => {
                self.cache
                    .set(&key::page(&namespace, page.page), page.results.clone());
                self.cache
                    .set(&key::total_pages(&namespace), page.total_pages);

                let mut state = self.state.write();
                state.items = page.results;
                state.current_page = page.page;
                state.total_pages = page.total_pages;
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

    /// Fetch the next page of the active kind and append it. Silent
    /// no-op while a load is running, past the last page, or with no
    /// active kind. On failure the cursor increment is rolled back so
    /// the list remains resumable from the last successful page.
    pub async fn load_more(&self) -> Result<(), ApiError> {
        let (kind, next_page) = {
            let mut state = self.state.write();
            if state.loading || state.loading_more {
                return Ok(());
            }
            if state.current_page >= state.total_pages {
                return Ok(());
            }
            let Some(kind) = state.kind.clone() else {
                return Ok(());
            };
            state.loading_more = true;
            state.current_page += 1;
            (kind, state.current_page)
        };
        self.notify();

        let namespace = self.source.namespace(&kind);

        match self.source.fetch_page(&kind, next_page).await {
            Ok(page) => {
                self.cache
                    .set(&key::page(&namespace, page.page), page.results.clone());
                self.cache
                    .set(&key::total_pages(&namespace), page.total_pages);

                let mut state = self.state.write();
                state.items.extend(page.results);
                state.current_page = page.page;
                state.total_pages = page.total_pages;
                state.loading_more = false;
                drop(state);
                self.notify();
                Ok(())
            }
            Err(err) => {
                let mut state = self.state.write();
                state.current_page -= 1;
                state.loading_more = false;
                state.error = Some(err.to_string());
                drop(state);
                self.notify();
                Err(err)
            }
        }
    }
}

impl<S: ListSource> std::fmt::Debug for ListStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("ListStore")
            .field("kind", &state.kind)
            .field("current_page", &state.current_page)
            .field("total_pages", &state.total_pages)
            .finish()
    }
}
