//! Entity detail store
//!
//! One detail slot per entity type, fronted by the fetch coordinator so
//! repeated navigations to the same entity are deduplicated and served
//! from cache. Loading is only signalled on a cache miss; a fresh hit
//! resolves synchronously without a spinner flash.

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::cache::key;
use crate::coordinator::FetchCoordinator;
use crate::error::ApiError;

/// Observable state of the detail view
#[derive(Debug, Clone)]
pub struct DetailState<T> {
    pub details: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for DetailState<T> {
    fn default() -> Self {
        Self {
            details: None,
            loading: false,
            error: None,
        }
    }
}

/// Cached, deduplicated detail fetches for one entity type
pub struct DetailStore<T: Clone + Send + Sync + 'static> {
    entity_type: &'static str,
    coordinator: FetchCoordinator,
    // Shared with background-refresh callbacks
    state: Arc<RwLock<DetailState<T>>>,
    changed: watch::Sender<u64>,
}

impl<T: Clone + Send + Sync + 'static> DetailStore<T> {
    pub fn new(entity_type: &'static str, coordinator: FetchCoordinator) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            entity_type,
            coordinator,
            state: Arc::new(RwLock::new(DetailState::default())),
            changed,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> DetailState<T> {
        self.state.read().clone()
    }

    /// Subscribe to change notifications (generation counter)
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    pub(crate) fn coordinator(&self) -> &FetchCoordinator {
        &self.coordinator
    }

    fn notify(&self) {
        self.changed.send_modify(|generation| *generation += 1);
    }

    /// Fetch the main detail record for `id` through the coordinator.
    /// When the value is served from cache, a successful background
    /// revalidation updates the observable details in place.
    pub async fn fetch<F, Fut>(&self, id: u64, producer: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let cache_key = key::entity(self.entity_type, id);

        // Only flag loading when the value is not already at hand
        if self.coordinator.cache().get::<T>(&cache_key).is_none() {
            let mut state = self.state.write();
            state.loading = true;
            state.details = None;
            state.error = None;
            drop(state);
            self.notify();
        }

        let refresh_state = Arc::clone(&self.state);
        let refresh_changed = self.changed.clone();
        let on_refresh = move |details: T| {
            let mut state = refresh_state.write();
            state.details = Some(details);
            drop(state);
            refresh_changed.send_modify(|generation| *generation += 1);
        };

        match self
            .coordinator
            .fetch_with_cache_notify(&cache_key, producer, on_refresh)
            .await
        {
            Ok(details) => {
                let mut state = self.state.write();
                state.details = Some(details.clone());
                state.loading = false;
                state.error = None;
                drop(state);
                self.notify();
                Ok(details)
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

    /// Fetch a sub-resource of `id` (credits, images, videos) through
    /// the coordinator without touching the detail state
    pub async fn fetch_sub<R, F, Fut>(
        &self,
        id: u64,
        sub: &str,
        producer: F,
    ) -> Result<R, ApiError>
    where
        R: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
    {
        let cache_key = key::sub_resource(self.entity_type, id, sub);
        self.coordinator.fetch_with_cache(&cache_key, producer).await
    }

    /// Like `fetch_sub`, but hands `on_refresh` the new value when a
    /// background revalidation replaces the cached sub-resource
    pub async fn fetch_sub_notify<R, F, Fut, N>(
        &self,
        id: u64,
        sub: &str,
        producer: F,
        on_refresh: N,
    ) -> Result<R, ApiError>
    where
        R: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
        N: FnOnce(R) + Send + 'static,
    {
        let cache_key = key::sub_resource(self.entity_type, id, sub);
        self.coordinator
            .fetch_with_cache_notify(&cache_key, producer, on_refresh)
            .await
    }
}

impl<T: Clone + Send + Sync + 'static> std::fmt::Debug for DetailStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("DetailStore")
            .field("entity_type", &self.entity_type)
            .field("loading", &state.loading)
            .field("has_details", &state.details.is_some())
            .finish()
    }
}
