//! Movie endpoints

use serde_json::Value;

use super::types::{
    Credits, EntityImages, Genre, GenreEnvelope, Movie, Page, ResultsEnvelope, Video,
};
use super::{page_param, query_param, TimeWindow, TmdbClient};
use crate::discover::{DiscoverFilters, MediaType};
use crate::error::ApiError;

impl TmdbClient {
    pub async fn popular_movies(&self, page: u32) -> Result<Page<Movie>, ApiError> {
        self.get_page("/movie/popular", &[page_param(page)], page)
            .await
    }

    pub async fn now_playing_movies(&self, page: u32) -> Result<Page<Movie>, ApiError> {
        self.get_page("/movie/now_playing", &[page_param(page)], page)
            .await
    }

    pub async fn top_rated_movies(&self, page: u32) -> Result<Page<Movie>, ApiError> {
        self.get_page("/movie/top_rated", &[page_param(page)], page)
            .await
    }

    pub async fn upcoming_movies(&self, page: u32) -> Result<Page<Movie>, ApiError> {
        self.get_page("/movie/upcoming", &[page_param(page)], page)
            .await
    }

    pub async fn search_movies(&self, query: &str, page: u32) -> Result<Page<Movie>, ApiError> {
        self.get_page(
            "/search/movie",
            &[query_param(query), page_param(page)],
            page,
        )
        .await
    }

    /// Structured discovery query; parameters are built from the filter
    /// object, absent fields omitted, `page` always explicit
    pub async fn discover_movies(
        &self,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<Page<Movie>, ApiError> {
        self.get_page(
            "/discover/movie",
            &filters.to_query_params(MediaType::Movie, page),
            page,
        )
        .await
    }

    pub async fn movie_details(&self, id: u64) -> Result<Movie, ApiError> {
        self.get_json(&format!("/movie/{}", id), &[]).await
    }

    pub async fn movie_credits(&self, id: u64) -> Result<Credits, ApiError> {
        self.get_json(&format!("/movie/{}/credits", id), &[]).await
    }

    pub async fn movie_images(&self, id: u64) -> Result<EntityImages, ApiError> {
        self.get_json(&format!("/movie/{}/images", id), &[]).await
    }

    pub async fn movie_videos(&self, id: u64) -> Result<Vec<Video>, ApiError> {
        let envelope: ResultsEnvelope<Video> = self
            .get_json(&format!("/movie/{}/videos", id), &[])
            .await?;
        Ok(envelope.results)
    }

    pub async fn trending_movies(&self, window: TimeWindow) -> Result<Vec<Movie>, ApiError> {
        let envelope: ResultsEnvelope<Movie> = self
            .get_json(&format!("/trending/movie/{}", window.as_str()), &[])
            .await?;
        Ok(envelope.results)
    }

    pub async fn movie_genres(&self) -> Result<Vec<Genre>, ApiError> {
        let envelope: GenreEnvelope = self.get_json("/genre/movie/list", &[]).await?;
        Ok(envelope.genres)
    }

    /// API configuration document (image base URLs, sizes). Kept as a
    /// raw JSON object; the data layer never interprets it.
    pub async fn configuration(&self) -> Result<Value, ApiError> {
        self.get_json("/configuration", &[]).await
    }
}
