//! TV catalog
//!
//! Mirrors the movie catalog over the TV endpoints. The now-playing
//! list maps to the on-the-air endpoint and keeps the `onTheAir` cache
//! namespace rather than the generic default.

use std::sync::Arc;

use async_trait::async_trait;

use super::detail::DetailStore;
use super::list::{ListKind, ListSource, ListStore};
use crate::cache::{key, CacheStore};
use crate::coordinator::FetchCoordinator;
use crate::discover::{DiscoverFilters, DiscoverSource, FilterStore};
use crate::error::ApiError;
use crate::remote::types::{Credits, EntityImages, Genre, Page, TvShow, Video};
use crate::remote::{TimeWindow, TmdbClient};

/// Paged TV list endpoints
pub struct TvListSource {
    client: Arc<TmdbClient>,
}

#[async_trait]
impl ListSource for TvListSource {
    type Item = TvShow;

    fn namespace(&self, kind: &ListKind) -> String {
        match kind {
            ListKind::NowPlaying => "onTheAir".to_string(),
            other => other.default_namespace(),
        }
    }

    async fn fetch_page(&self, kind: &ListKind, page: u32) -> Result<Page<TvShow>, ApiError> {
        match kind {
            ListKind::Popular => self.client.popular_tv(page).await,
            ListKind::NowPlaying => self.client.on_the_air_tv(page).await,
            ListKind::TopRated => self.client.top_rated_tv(page).await,
            ListKind::Search { query } => self.client.search_tv(query.trim(), page).await,
        }
    }
}

/// TV search and discovery endpoints
pub struct TvDiscoverSource {
    client: Arc<TmdbClient>,
}

#[async_trait]
impl DiscoverSource for TvDiscoverSource {
    type Item = TvShow;

    async fn search(&self, query: &str, page: u32) -> Result<Page<TvShow>, ApiError> {
        self.client.search_tv(query, page).await
    }

    async fn discover(
        &self,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<Page<TvShow>, ApiError> {
        self.client.discover_tv(filters, page).await
    }
}

/// All TV browsing state for one session
pub struct TvCatalog {
    client: Arc<TmdbClient>,
    coordinator: FetchCoordinator,
    lists: ListStore<TvListSource>,
    filters: FilterStore<TvDiscoverSource>,
    details: DetailStore<TvShow>,
}

impl TvCatalog {
    pub fn new(client: Arc<TmdbClient>) -> Self {
        Self::with_cache(client, Arc::new(CacheStore::with_default_ttl()))
    }

    pub fn with_cache(client: Arc<TmdbClient>, cache: Arc<CacheStore>) -> Self {
        let coordinator = FetchCoordinator::new(Arc::clone(&cache));
        Self {
            lists: ListStore::new(
                TvListSource {
                    client: Arc::clone(&client),
                },
                cache,
            ),
            filters: FilterStore::new(TvDiscoverSource {
                client: Arc::clone(&client),
            }),
            details: DetailStore::new("tv", coordinator.clone()),
            coordinator,
            client,
        }
    }

    pub fn lists(&self) -> &ListStore<TvListSource> {
        &self.lists
    }

    pub fn filters(&self) -> &FilterStore<TvDiscoverSource> {
        &self.filters
    }

    pub fn details(&self) -> &DetailStore<TvShow> {
        &self.details
    }

    pub async fn fetch_popular(&self) -> Result<(), ApiError> {
        self.lists.load(ListKind::Popular).await
    }

    pub async fn fetch_on_the_air(&self) -> Result<(), ApiError> {
        self.lists.load(ListKind::NowPlaying).await
    }

    pub async fn fetch_top_rated(&self) -> Result<(), ApiError> {
        self.lists.load(ListKind::TopRated).await
    }

    pub async fn search(&self, query: &str) -> Result<(), ApiError> {
        self.lists
            .load(ListKind::Search {
                query: query.to_string(),
            })
            .await
    }

    pub async fn load_more(&self) -> Result<(), ApiError> {
        self.lists.load_more().await
    }

    pub async fn apply_filters(&self, filters: DiscoverFilters) -> Result<(), ApiError> {
        self.filters.apply(filters).await
    }

    pub async fn load_more_filtered(&self) -> Result<(), ApiError> {
        self.filters.load_more().await
    }

    pub fn clear_filters(&self) {
        self.filters.clear();
    }

    pub async fn fetch_details(&self, id: u64) -> Result<TvShow, ApiError> {
        let client = Arc::clone(&self.client);
        self.details
            .fetch(id, move || async move { client.tv_details(id).await })
            .await
    }

    pub async fn fetch_credits(&self, id: u64) -> Result<Credits, ApiError> {
        let client = Arc::clone(&self.client);
        self.details
            .fetch_sub(id, "credits", move || async move {
                client.tv_credits(id).await
            })
            .await
    }

    pub async fn fetch_images(&self, id: u64) -> Result<EntityImages, ApiError> {
        let client = Arc::clone(&self.client);
        self.details
            .fetch_sub(id, "images", move || async move {
                client.tv_images(id).await
            })
            .await
    }

    pub async fn fetch_videos(&self, id: u64) -> Result<Vec<Video>, ApiError> {
        let client = Arc::clone(&self.client);
        self.details
            .fetch_sub(id, "videos", move || async move {
                client.tv_videos(id).await
            })
            .await
    }

    pub async fn fetch_genres(&self) -> Result<Vec<Genre>, ApiError> {
        let client = Arc::clone(&self.client);
        self.coordinator
            .fetch_with_cache(key::GENRES, move || async move { client.tv_genres().await })
            .await
    }

    pub async fn fetch_airing_today(&self) -> Result<Vec<TvShow>, ApiError> {
        let client = Arc::clone(&self.client);
        self.coordinator
            .fetch_with_cache("airingToday", move || async move {
                client
                    .airing_today_tv(crate::constants::FIRST_PAGE)
                    .await
                    .map(|page| page.results)
            })
            .await
    }

    pub async fn fetch_trending(&self, window: TimeWindow) -> Result<Vec<TvShow>, ApiError> {
        let client = Arc::clone(&self.client);
        let cache_key = format!("trending:{}", window.as_str());
        self.coordinator
            .fetch_with_cache(&cache_key, move || async move {
                client.trending_tv(window).await
            })
            .await
    }
}

impl std::fmt::Debug for TvCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TvCatalog")
            .field("lists", &self.lists)
            .field("filters", &self.filters)
            .finish()
    }
}
