//! Filter/discovery queries
//!
//! Translates a structured filter object into remote query parameters.
//! The backend cannot combine free-text search with structured filters,
//! so a non-empty query always dispatches to the plain search endpoint
//! and the structured fields are ignored (documented backend
//! limitation, not a bug to silently fix).

pub mod store;

pub use store::{DiscoverSource, FilterState, FilterStore};

use serde::{Deserialize, Serialize};

/// Target media type for a discovery query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Movie,
    Tv,
}

/// Structured filter object; absent fields are omitted from the
/// dispatched query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoverFilters {
    /// Free-text query; takes precedence over every structured filter
    pub query: Option<String>,
    /// Genre ids, joined with `,` (AND semantics on the backend)
    #[serde(default)]
    pub genres: Vec<i32>,
    /// Release year (movies)
    pub year: Option<i32>,
    /// First air date year (TV)
    pub first_air_date_year: Option<i32>,
    /// Minimum vote average; 0 counts as unset
    pub vote_average_gte: Option<f32>,
    /// Original language code, e.g. `en`
    pub language: Option<String>,
    /// Minimum runtime in minutes
    pub runtime_min: Option<u32>,
    /// Maximum runtime in minutes
    pub runtime_max: Option<u32>,
    /// Release / first-air date lower bound (`YYYY-MM-DD`)
    pub date_from: Option<String>,
    /// Release / first-air date upper bound (`YYYY-MM-DD`)
    pub date_to: Option<String>,
}

impl DiscoverFilters {
    /// The trimmed free-text query, when non-empty
    pub fn query_text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }

    /// Structurally true iff at least one filter field is present /
    /// non-default; decides whether the filtered result set is the one
    /// displayed
    pub fn is_active(&self) -> bool {
        self.query_text().is_some()
            || !self.genres.is_empty()
            || self.year.is_some()
            || self.first_air_date_year.is_some()
            || self.vote_average_gte.map(|v| v > 0.0).unwrap_or(false)
            || self.language.is_some()
            || self.runtime_min.is_some()
            || self.runtime_max.is_some()
            || self.date_from.is_some()
            || self.date_to.is_some()
    }

    /// Build discovery query parameters, appending only the parameters
    /// present and always forcing an explicit `page`. The free-text
    /// query is deliberately never included here; callers dispatch it
    /// to the search endpoint instead.
    pub fn to_query_params(&self, media: MediaType, page: u32) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = Vec::new();

        if !self.genres.is_empty() {
            let joined = self
                .genres
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("with_genres".to_string(), joined));
        }

        match media {
            MediaType::Movie => {
                if let Some(year) = self.year {
                    params.push(("primary_release_year".to_string(), year.to_string()));
                }
                if let Some(from) = &self.date_from {
                    params.push(("primary_release_date.gte".to_string(), from.clone()));
                }
                if let Some(to) = &self.date_to {
                    params.push(("primary_release_date.lte".to_string(), to.clone()));
                }
            }
            MediaType::Tv => {
                if let Some(year) = self.first_air_date_year {
                    params.push(("first_air_date_year".to_string(), year.to_string()));
                }
                if let Some(from) = &self.date_from {
                    params.push(("first_air_date.gte".to_string(), from.clone()));
                }
                if let Some(to) = &self.date_to {
                    params.push(("first_air_date.lte".to_string(), to.clone()));
                }
            }
        }

        if let Some(rating) = self.vote_average_gte {
            if rating > 0.0 {
                params.push(("vote_average.gte".to_string(), rating.to_string()));
            }
        }
        if let Some(language) = &self.language {
            params.push(("with_original_language".to_string(), language.clone()));
        }
        if let Some(min) = self.runtime_min {
            params.push(("with_runtime.gte".to_string(), min.to_string()));
        }
        if let Some(max) = self.runtime_max {
            params.push(("with_runtime.lte".to_string(), max.to_string()));
        }

        params.push(("page".to_string(), page.to_string()));
        params
    }
}
