//! Catalog API response types
//!
//! Raw wire shapes are normalized at the client boundary: paged
//! endpoints always come back as `Page<T>` with defaulted pagination
//! fields, envelope endpoints (`genres`, `videos`) are unwrapped, and
//! the configuration document stays a raw JSON object.

use serde::{Deserialize, Serialize};

/// One normalized page of catalog results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

/// Raw paged response as sent by the API; pagination fields may be absent
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    pub page: Option<u32>,
    pub total_pages: Option<u32>,
    pub total_results: Option<u64>,
}

impl<T> RawPage<T> {
    /// Normalize into a `Page`, falling back to the requested page
    /// number and single-page totals when fields are missing
    pub(crate) fn into_page(self, requested_page: u32) -> Page<T> {
        Page {
            results: self.results,
            page: self.page.unwrap_or(requested_page),
            total_pages: self.total_pages.unwrap_or(1),
            total_results: self.total_results.unwrap_or(0),
        }
    }
}

/// Envelope for endpoints that wrap a plain list in `results`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResultsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Envelope for the genre list endpoints
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenreEnvelope {
    #[serde(default = "Vec::new")]
    pub genres: Vec<Genre>,
}

/// Error body optionally carried by non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub status_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub video: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvShow {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub profile_path: Option<String>,
    pub biography: Option<String>,
    pub known_for_department: Option<String>,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub order: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    pub job: Option<String>,
    pub department: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default = "Vec::new")]
    pub cast: Vec<CastMember>,
    #[serde(default = "Vec::new")]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub file_path: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub aspect_ratio: Option<f64>,
}

/// Image collections; which lists are populated depends on the entity
/// (backdrops/posters for movies and TV, profiles for people)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityImages {
    #[serde(default = "Vec::new")]
    pub backdrops: Vec<Image>,
    #[serde(default = "Vec::new")]
    pub posters: Vec<Image>,
    #[serde(default = "Vec::new")]
    pub profiles: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
}

/// One credit from a person's combined movie/TV credits.
/// `title` is set for movies, `name` for TV shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedCredit {
    pub id: u64,
    pub media_type: String,
    pub title: Option<String>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub character: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedCredits {
    #[serde(default = "Vec::new")]
    pub cast: Vec<CombinedCredit>,
    #[serde(default = "Vec::new")]
    pub crew: Vec<CombinedCredit>,
}
