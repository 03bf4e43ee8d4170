//! TV show endpoints

use super::types::{
    Credits, EntityImages, Genre, GenreEnvelope, Page, ResultsEnvelope, TvShow, Video,
};
use super::{page_param, query_param, TimeWindow, TmdbClient};
use crate::discover::{DiscoverFilters, MediaType};
use crate::error::ApiError;

impl TmdbClient {
    pub async fn popular_tv(&self, page: u32) -> Result<Page<TvShow>, ApiError> {
        self.get_page("/tv/popular", &[page_param(page)], page).await
    }

    pub async fn on_the_air_tv(&self, page: u32) -> Result<Page<TvShow>, ApiError> {
        self.get_page("/tv/on_the_air", &[page_param(page)], page)
            .await
    }

    pub async fn top_rated_tv(&self, page: u32) -> Result<Page<TvShow>, ApiError> {
        self.get_page("/tv/top_rated", &[page_param(page)], page)
            .await
    }

    pub async fn airing_today_tv(&self, page: u32) -> Result<Page<TvShow>, ApiError> {
        self.get_page("/tv/airing_today", &[page_param(page)], page)
            .await
    }

    pub async fn search_tv(&self, query: &str, page: u32) -> Result<Page<TvShow>, ApiError> {
        self.get_page("/search/tv", &[query_param(query), page_param(page)], page)
            .await
    }

    pub async fn discover_tv(
        &self,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<Page<TvShow>, ApiError> {
        self.get_page(
            "/discover/tv",
            &filters.to_query_params(MediaType::Tv, page),
            page,
        )
        .await
    }

    pub async fn tv_details(&self, id: u64) -> Result<TvShow, ApiError> {
        self.get_json(&format!("/tv/{}", id), &[]).await
    }

    pub async fn tv_credits(&self, id: u64) -> Result<Credits, ApiError> {
        self.get_json(&format!("/tv/{}/credits", id), &[]).await
    }

    pub async fn tv_images(&self, id: u64) -> Result<EntityImages, ApiError> {
        self.get_json(&format!("/tv/{}/images", id), &[]).await
    }

    pub async fn tv_videos(&self, id: u64) -> Result<Vec<Video>, ApiError> {
        let envelope: ResultsEnvelope<Video> =
            self.get_json(&format!("/tv/{}/videos", id), &[]).await?;
        Ok(envelope.results)
    }

    pub async fn trending_tv(&self, window: TimeWindow) -> Result<Vec<TvShow>, ApiError> {
        let envelope: ResultsEnvelope<TvShow> = self
            .get_json(&format!("/trending/tv/{}", window.as_str()), &[])
            .await?;
        Ok(envelope.results)
    }

    pub async fn tv_genres(&self) -> Result<Vec<Genre>, ApiError> {
        let envelope: GenreEnvelope = self.get_json("/genre/tv/list", &[]).await?;
        Ok(envelope.genres)
    }
}
