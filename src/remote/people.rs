//! People endpoints

use super::types::{CombinedCredits, EntityImages, Person};
use super::TmdbClient;
use crate::error::ApiError;

impl TmdbClient {
    pub async fn person_details(&self, id: u64) -> Result<Person, ApiError> {
        self.get_json(&format!("/person/{}", id), &[]).await
    }

    pub async fn person_images(&self, id: u64) -> Result<EntityImages, ApiError> {
        self.get_json(&format!("/person/{}/images", id), &[]).await
    }

    /// Combined movie and TV credits for a person
    pub async fn person_combined_credits(&self, id: u64) -> Result<CombinedCredits, ApiError> {
        self.get_json(&format!("/person/{}/combined_credits", id), &[])
            .await
    }
}
