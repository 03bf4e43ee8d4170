// Request Coordinator
//
// Deduplicates concurrent fetches for the same cache key.
// When multiple callers request the same key simultaneously:
// - First caller (leader): runs the producer, caches the result, settles
// - Subsequent callers (waiters): await the leader's settle event
// - All callers: observe the identical Ok/Err outcome (true deduplication)
//
// When the cache already holds a fresh value the caller gets it
// immediately and a background refresh is dispatched instead
// (stale-while-revalidate); background failures are logged and never
// surface to the caller that received the cached value.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::warn;

use crate::cache::CacheStore;
use crate::error::ApiError;

/// Outcome shared with coalesced waiters: the cached allocation on
/// success, the producer's error on failure
type SharedResult = Result<Arc<dyn Any + Send + Sync>, ApiError>;

type InFlightMap = Mutex<HashMap<String, watch::Sender<Option<SharedResult>>>>;

/// Callback handed the refreshed value when a background revalidation
/// succeeds; background failures never reach it
type RefreshCallback<T> = Box<dyn FnOnce(T) + Send>;

/// Coordinates cache reads, request deduplication and background
/// revalidation for one catalog session
#[derive(Clone)]
pub struct FetchCoordinator {
    cache: Arc<CacheStore>,
    in_flight: Arc<InFlightMap>,
}

enum Role {
    Leader(watch::Sender<Option<SharedResult>>),
    Waiter(watch::Receiver<Option<SharedResult>>),
}

impl FetchCoordinator {
    pub fn new(cache: Arc<CacheStore>) -> Self {
        Self {
            cache,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The cache backing this coordinator
    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// Current number of in-flight producers
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Fetch with caching, deduplication and stale-while-revalidate.
    ///
    /// - Fresh cache hit: returns the cached value immediately and
    ///   refreshes in the background (unless a request for the key is
    ///   already in flight).
    /// - Key in flight: awaits the same settle event as every other
    ///   caller; at most one producer runs per key at any time.
    /// - Otherwise: runs `producer` in the foreground; success populates
    ///   the cache, failure propagates without caching. The in-flight
    ///   marker is removed on every exit path.
    pub async fn fetch_with_cache<T, F, Fut>(&self, key: &str, producer: F) -> Result<T, ApiError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        self.fetch_inner(key, producer, true, None).await
    }

    /// Like `fetch_with_cache`, but hands `on_refresh` the new value
    /// when a background revalidation succeeds, so reactive observers
    /// pick up refreshed data instead of holding the stale value until
    /// the next explicit fetch.
    pub async fn fetch_with_cache_notify<T, F, Fut, N>(
        &self,
        key: &str,
        producer: F,
        on_refresh: N,
    ) -> Result<T, ApiError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
        N: FnOnce(T) + Send + 'static,
    {
        self.fetch_inner(key, producer, true, Some(Box::new(on_refresh)))
            .await
    }

    /// Like `fetch_with_cache` but skips the background refresh on a
    /// cache hit. Used for rarely-changing resources such as the API
    /// configuration document.
    pub async fn fetch_with_cache_static<T, F, Fut>(
        &self,
        key: &str,
        producer: F,
    ) -> Result<T, ApiError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        self.fetch_inner(key, producer, false, None).await
    }

    async fn fetch_inner<T, F, Fut>(
        &self,
        key: &str,
        producer: F,
        revalidate: bool,
        on_refresh: Option<RefreshCallback<T>>,
    ) -> Result<T, ApiError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        // Fresh cache hit: the cached value is authoritative for this call
        if let Some(cached) = self.cache.get::<T>(key) {
            if revalidate {
                self.revalidate_in_background(key, producer, on_refresh);
            }
            return Ok(cached);
        }

        // Check-then-insert under one lock to preserve the
        // at-most-one-producer invariant on a multi-threaded runtime
        let role = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.get(key) {
                Some(sender) => Role::Waiter(sender.subscribe()),
                None => {
                    let (sender, _) = watch::channel(None);
                    in_flight.insert(key.to_string(), sender.clone());
                    Role::Leader(sender)
                }
            }
        };

        match role {
            Role::Waiter(receiver) => Self::await_settle(receiver).await,
            Role::Leader(sender) => {
                // Guard removes the marker even if the producer panics or
                // this future is dropped mid-await
                let guard = InFlightGuard {
                    key: key.to_string(),
                    in_flight: Arc::clone(&self.in_flight),
                };

                let result = producer().await;

                let shared: SharedResult = match &result {
                    Ok(value) => {
                        let arc: Arc<dyn Any + Send + Sync> = Arc::new(value.clone());
                        self.cache.set_shared(key, arc.clone());
                        Ok(arc)
                    }
                    Err(err) => Err(err.clone()),
                };

                drop(guard);
                let _ = sender.send(Some(shared));
                result
            }
        }
    }

    async fn await_settle<T>(mut receiver: watch::Receiver<Option<SharedResult>>) -> Result<T, ApiError>
    where
        T: Clone + Send + Sync + 'static,
    {
        if receiver.wait_for(|settled| settled.is_some()).await.is_err() {
            // Leader dropped without settling (panic or cancellation)
            return Err(ApiError::Transport(
                "in-flight request was abandoned".to_string(),
            ));
        }

        let settled = receiver
            .borrow()
            .clone()
            .expect("settle event checked above");

        match settled {
            Ok(value) => value
                .downcast::<T>()
                .map(|arc| (*arc).clone())
                .map_err(|_| {
                    ApiError::Transport("in-flight value had an unexpected type".to_string())
                }),
            Err(err) => Err(err),
        }
    }

    /// Dispatch a background refresh for `key` unless one is already in
    /// flight. Success overwrites the cache and notifies `on_refresh`;
    /// failure is logged and swallowed so it never disturbs the caller
    /// holding the cached value.
    fn revalidate_in_background<T, F, Fut>(
        &self,
        key: &str,
        producer: F,
        on_refresh: Option<RefreshCallback<T>>,
    ) where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let sender = {
            let mut in_flight = self.in_flight.lock();
            if in_flight.contains_key(key) {
                return;
            }
            let (sender, _) = watch::channel(None);
            in_flight.insert(key.to_string(), sender.clone());
            sender
        };

        let future = producer();
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);
        let key = key.to_string();

        tokio::spawn(async move {
            let result = future.await;

            let shared: SharedResult = match result {
                Ok(value) => {
                    let arc: Arc<dyn Any + Send + Sync> = Arc::new(value.clone());
                    cache.set_shared(&key, arc.clone());
                    if let Some(on_refresh) = on_refresh {
                        on_refresh(value);
                    }
                    Ok(arc)
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "background refresh failed");
                    Err(err)
                }
            };

            in_flight.lock().remove(&key);
            // Callers that missed the cache while this refresh was in
            // flight are waiting on the same settle event
            let _ = sender.send(Some(shared));
        });
    }
}

impl std::fmt::Debug for FetchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCoordinator")
            .field("cache", &self.cache)
            .field("in_flight", &self.in_flight.lock().len())
            .finish()
    }
}

/// Removes the in-flight marker for a key when dropped, so no key is
/// ever left "in flight" forever
struct InFlightGuard {
    key: String,
    in_flight: Arc<InFlightMap>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn coordinator() -> FetchCoordinator {
        FetchCoordinator::new(Arc::new(CacheStore::with_default_ttl()))
    }

    #[tokio::test]
    async fn test_foreground_fetch_populates_cache() {
        let coordinator = coordinator();

        let value = coordinator
            .fetch_with_cache("movie:603", || async { Ok::<_, ApiError>(99u32) })
            .await
            .unwrap();

        assert_eq!(value, 99);
        assert_eq!(coordinator.cache().get::<u32>("movie:603"), Some(99));
        assert_eq!(coordinator.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_foreground_failure_propagates_and_does_not_cache() {
        let coordinator = coordinator();

        let result = coordinator
            .fetch_with_cache("movie:603", || async {
                Err::<u32, _>(ApiError::http(500, None))
            })
            .await;

        assert_eq!(result, Err(ApiError::http(500, None)));
        assert_eq!(coordinator.cache().get::<u32>("movie:603"), None);
        assert_eq!(coordinator.in_flight_count(), 0, "marker must not leak");
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_producer_invocation() {
        let coordinator = coordinator();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = vec![];
        for _ in 0..8 {
            let coordinator = coordinator.clone();
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                coordinator
                    .fetch_with_cache("genres", move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, ApiError>("fantasy".to_string())
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "fantasy");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1, "exactly one network call");
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_the_same_rejection() {
        let coordinator = coordinator();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = vec![];
        for _ in 0..5 {
            let coordinator = coordinator.clone();
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                coordinator
                    .fetch_with_cache("genres", move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Err::<String, _>(ApiError::Timeout)
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Err(ApiError::Timeout));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_returns_without_waiting_for_refresh() {
        let coordinator = coordinator();
        coordinator.cache().set("configuration", 7u32);

        let value = coordinator
            .fetch_with_cache("configuration", || async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, ApiError>(8u32)
            })
            .await
            .unwrap();

        // Cached value is authoritative for the immediate call
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_background_refresh_overwrites_cache_on_success() {
        let coordinator = coordinator();
        coordinator.cache().set("genres", 1u32);

        let value = coordinator
            .fetch_with_cache("genres", || async { Ok::<_, ApiError>(2u32) })
            .await
            .unwrap();
        assert_eq!(value, 1);

        // Let the spawned refresh complete
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(coordinator.cache().get::<u32>("genres"), Some(2));
        assert_eq!(coordinator.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_background_refresh_failure_is_swallowed() {
        let coordinator = coordinator();
        coordinator.cache().set("genres", 1u32);

        let value = coordinator
            .fetch_with_cache("genres", || async {
                Err::<u32, _>(ApiError::Transport("boom".to_string()))
            })
            .await
            .unwrap();
        assert_eq!(value, 1);

        tokio::time::sleep(Duration::from_millis(20)).await;
        // Cached value untouched, marker cleaned up
        assert_eq!(coordinator.cache().get::<u32>("genres"), Some(1));
        assert_eq!(coordinator.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_static_fetch_skips_background_refresh() {
        let coordinator = coordinator();
        coordinator.cache().set("configuration", 1u32);
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = Arc::clone(&calls);
        let value = coordinator
            .fetch_with_cache_static("configuration", move || async move {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ApiError>(2u32)
            })
            .await
            .unwrap();

        assert_eq!(value, 1);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0, "no refresh dispatched");
        assert_eq!(coordinator.cache().get::<u32>("configuration"), Some(1));
    }

    #[tokio::test]
    async fn test_notify_callback_receives_background_refresh() {
        let coordinator = coordinator();
        coordinator.cache().set("movie:603", "stale".to_string());

        let observed: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let observed_clone = Arc::clone(&observed);
        let value = coordinator
            .fetch_with_cache_notify(
                "movie:603",
                || async { Ok::<_, ApiError>("refreshed".to_string()) },
                move |refreshed| *observed_clone.lock() = Some(refreshed),
            )
            .await
            .unwrap();

        assert_eq!(value, "stale");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(*observed.lock(), Some("refreshed".to_string()));
        assert_eq!(
            coordinator.cache().get::<String>("movie:603"),
            Some("refreshed".to_string())
        );
    }

    #[tokio::test]
    async fn test_notify_callback_skipped_on_background_failure() {
        let coordinator = coordinator();
        coordinator.cache().set("movie:603", "stale".to_string());

        let observed: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let observed_clone = Arc::clone(&observed);
        let value = coordinator
            .fetch_with_cache_notify(
                "movie:603",
                || async { Err::<String, _>(ApiError::Timeout) },
                move |refreshed| *observed_clone.lock() = Some(refreshed),
            )
            .await
            .unwrap();

        assert_eq!(value, "stale");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(*observed.lock(), None);
        assert_eq!(
            coordinator.cache().get::<String>("movie:603"),
            Some("stale".to_string())
        );
    }

    #[tokio::test]
    async fn test_notify_callback_skipped_on_foreground_fetch() {
        let coordinator = coordinator();

        let observed: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let observed_clone = Arc::clone(&observed);
        let value = coordinator
            .fetch_with_cache_notify(
                "movie:603",
                || async { Ok::<_, ApiError>("fetched".to_string()) },
                move |refreshed| *observed_clone.lock() = Some(refreshed),
            )
            .await
            .unwrap();

        // The caller already holds the fresh value; no extra notification
        assert_eq!(value, "fetched");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(*observed.lock(), None);
    }

    #[tokio::test]
    async fn test_different_keys_do_not_coalesce() {
        let coordinator = coordinator();
        let calls = Arc::new(AtomicUsize::new(0));

        let c1 = Arc::clone(&calls);
        let c2 = Arc::clone(&calls);
        let (a, b) = tokio::join!(
            coordinator.fetch_with_cache("movie:1", move || async move {
                c1.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ApiError>(1u32)
            }),
            coordinator.fetch_with_cache("movie:2", move || async move {
                c2.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ApiError>(2u32)
            }),
        );

        assert_eq!(a.unwrap(), 1);
        assert_eq!(b.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_marker_removed_after_settle_allows_new_leader() {
        let coordinator = coordinator();

        coordinator
            .fetch_with_cache("tv:42", || async {
                Err::<u32, _>(ApiError::http(503, None))
            })
            .await
            .unwrap_err();

        // A retry becomes a fresh leader rather than waiting forever
        let value = coordinator
            .fetch_with_cache("tv:42", || async { Ok::<_, ApiError>(5u32) })
            .await
            .unwrap();
        assert_eq!(value, 5);
    }
}
