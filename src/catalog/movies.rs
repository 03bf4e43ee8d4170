//! Movie catalog
//!
//! Binds the movie endpoints to the list, filter and detail stores.
//! Each catalog owns its cache and coordinator so movie and TV keys
//! never collide even though both use the same `popular:{page}` shape.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::detail::DetailStore;
use super::list::{ListKind, ListSource, ListStore};
use crate::cache::{key, CacheStore};
use crate::constants::FIRST_PAGE;
use crate::coordinator::FetchCoordinator;
use crate::discover::{DiscoverFilters, DiscoverSource, FilterStore};
use crate::error::ApiError;
use crate::remote::types::{Credits, EntityImages, Genre, Movie, Page, Video};
use crate::remote::{TimeWindow, TmdbClient};

/// Paged movie list endpoints
pub struct MovieListSource {
    client: Arc<TmdbClient>,
}

#[async_trait]
impl ListSource for MovieListSource {
    type Item = Movie;

    async fn fetch_page(&self, kind: &ListKind, page: u32) -> Result<Page<Movie>, ApiError> {
        match kind {
            ListKind::Popular => self.client.popular_movies(page).await,
            ListKind::NowPlaying => self.client.now_playing_movies(page).await,
            ListKind::TopRated => self.client.top_rated_movies(page).await,
            ListKind::Search { query } => self.client.search_movies(query.trim(), page).await,
        }
    }
}

/// Movie search and discovery endpoints
pub struct MovieDiscoverSource {
    client: Arc<TmdbClient>,
}

#[async_trait]
impl DiscoverSource for MovieDiscoverSource {
    type Item = Movie;

    async fn search(&self, query: &str, page: u32) -> Result<Page<Movie>, ApiError> {
        self.client.search_movies(query, page).await
    }

    async fn discover(
        &self,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<Page<Movie>, ApiError> {
        self.client.discover_movies(filters, page).await
    }
}

/// All movie browsing state for one session
pub struct MovieCatalog {
    client: Arc<TmdbClient>,
    coordinator: FetchCoordinator,
    lists: ListStore<MovieListSource>,
    filters: FilterStore<MovieDiscoverSource>,
    details: DetailStore<Movie>,
}

impl MovieCatalog {
    pub fn new(client: Arc<TmdbClient>) -> Self {
        Self::with_cache(client, Arc::new(CacheStore::with_default_ttl()))
    }

    pub fn with_cache(client: Arc<TmdbClient>, cache: Arc<CacheStore>) -> Self {
        let coordinator = FetchCoordinator::new(Arc::clone(&cache));
        Self {
            lists: ListStore::new(
                MovieListSource {
                    client: Arc::clone(&client),
                },
                cache,
            ),
            filters: FilterStore::new(MovieDiscoverSource {
                client: Arc::clone(&client),
            }),
            details: DetailStore::new("movie", coordinator.clone()),
            coordinator,
            client,
        }
    }

    pub fn lists(&self) -> &ListStore<MovieListSource> {
        &self.lists
    }

    pub fn filters(&self) -> &FilterStore<MovieDiscoverSource> {
        &self.filters
    }

    pub fn details(&self) -> &DetailStore<Movie> {
        &self.details
    }

    pub async fn fetch_popular(&self) -> Result<(), ApiError> {
        self.lists.load(ListKind::Popular).await
    }

    pub async fn fetch_now_playing(&self) -> Result<(), ApiError> {
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

    pub async fn fetch_details(&self, id: u64) -> Result<Movie, ApiError> {
        let client = Arc::clone(&self.client);
        self.details
            .fetch(id, move || async move { client.movie_details(id).await })
            .await
    }

    pub async fn fetch_credits(&self, id: u64) -> Result<Credits, ApiError> {
        let client = Arc::clone(&self.client);
        self.details
            .fetch_sub(id, "credits", move || async move {
                client.movie_credits(id).await
            })
            .await
    }

    pub async fn fetch_images(&self, id: u64) -> Result<EntityImages, ApiError> {
        let client = Arc::clone(&self.client);
        self.details
            .fetch_sub(id, "images", move || async move {
                client.movie_images(id).await
            })
            .await
    }

    pub async fn fetch_videos(&self, id: u64) -> Result<Vec<Video>, ApiError> {
        let client = Arc::clone(&self.client);
        self.details
            .fetch_sub(id, "videos", move || async move {
                client.movie_videos(id).await
            })
            .await
    }

    pub async fn fetch_genres(&self) -> Result<Vec<Genre>, ApiError> {
        let client = Arc::clone(&self.client);
        self.coordinator
            .fetch_with_cache(key::GENRES, move || async move {
                client.movie_genres().await
            })
            .await
    }

    /// API configuration document; long-lived, so a fresh cache hit
    /// does not trigger a background refresh
    pub async fn fetch_configuration(&self) -> Result<Value, ApiError> {
        let client = Arc::clone(&self.client);
        self.coordinator
            .fetch_with_cache_static(key::CONFIGURATION, move || async move {
                client.configuration().await
            })
            .await
    }

    pub async fn fetch_upcoming(&self) -> Result<Vec<Movie>, ApiError> {
        let client = Arc::clone(&self.client);
        self.coordinator
            .fetch_with_cache("upcoming", move || async move {
                client
                    .upcoming_movies(FIRST_PAGE)
                    .await
                    .map(|page| page.results)
            })
            .await
    }

    pub async fn fetch_trending(&self, window: TimeWindow) -> Result<Vec<Movie>, ApiError> {
        let client = Arc::clone(&self.client);
        let cache_key = format!("trending:{}", window.as_str());
        self.coordinator
            .fetch_with_cache(&cache_key, move || async move {
                client.trending_movies(window).await
            })
            .await
    }
}

impl std::fmt::Debug for MovieCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieCatalog")
            .field("lists", &self.lists)
            .field("filters", &self.filters)
            .finish()
    }
}
