//! Person catalog
//!
//! People have no paged lists; the catalog holds the detail record plus
//! the images and combined credits fetched alongside it. The detail
//! fetch is authoritative, the companion fetches are best-effort:
//! their failures are logged and the detail view renders without them.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use super::detail::DetailStore;
use crate::cache::{key, CacheStore};
use crate::coordinator::FetchCoordinator;
use crate::error::ApiError;
use crate::remote::types::{CombinedCredits, EntityImages, Person};
use crate::remote::TmdbClient;

/// Companion media for the person detail view
#[derive(Debug, Clone, Default)]
pub struct PersonMedia {
    pub images: Option<EntityImages>,
    pub credits: Option<CombinedCredits>,
}

/// Person browsing state for one session
pub struct PersonCatalog {
    client: Arc<TmdbClient>,
    details: DetailStore<Person>,
    // Shared with background-refresh callbacks
    media: Arc<RwLock<PersonMedia>>,
}

impl PersonCatalog {
    pub fn new(client: Arc<TmdbClient>) -> Self {
        Self::with_cache(client, Arc::new(CacheStore::with_default_ttl()))
    }

    pub fn with_cache(client: Arc<TmdbClient>, cache: Arc<CacheStore>) -> Self {
        let coordinator = FetchCoordinator::new(cache);
        Self {
            client,
            details: DetailStore::new("person", coordinator),
            media: Arc::new(RwLock::new(PersonMedia::default())),
        }
    }

    pub fn details(&self) -> &DetailStore<Person> {
        &self.details
    }

    /// Snapshot of the companion images and credits
    pub fn media(&self) -> PersonMedia {
        self.media.read().clone()
    }

    /// Load the person record plus images and combined credits. The
    /// detail error propagates; companion failures are logged and the
    /// corresponding slot is left empty.
    pub async fn fetch_person(&self, id: u64) -> Result<Person, ApiError> {
        // Fresh navigation: drop the previous person's media so stale
        // imagery never shows under the new record
        if self
            .details
            .coordinator()
            .cache()
            .get::<Person>(&key::entity("person", id))
            .is_none()
        {
            *self.media.write() = PersonMedia::default();
        }

        let client = Arc::clone(&self.client);
        let person = self
            .details
            .fetch(id, move || async move { client.person_details(id).await })
            .await?;

        let client = Arc::clone(&self.client);
        let media = Arc::clone(&self.media);
        match self
            .details
            .fetch_sub_notify(
                id,
                "images",
                move || async move { client.person_images(id).await },
                move |images| media.write().images = Some(images),
            )
            .await
        {
            Ok(images) => self.media.write().images = Some(images),
            Err(err) => warn!(person_id = id, error = %err, "failed to fetch person images"),
        }

        let client = Arc::clone(&self.client);
        let media = Arc::clone(&self.media);
        match self
            .details
            .fetch_sub_notify(
                id,
                "combined_credits",
                move || async move { client.person_combined_credits(id).await },
                move |credits| media.write().credits = Some(credits),
            )
            .await
        {
            Ok(credits) => self.media.write().credits = Some(credits),
            Err(err) => warn!(person_id = id, error = %err, "failed to fetch person credits"),
        }

        Ok(person)
    }
}

impl std::fmt::Debug for PersonCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let media = self.media.read();
        f.debug_struct("PersonCatalog")
            .field("details", &self.details)
            .field("has_images", &media.images.is_some())
            .field("has_credits", &media.credits.is_some())
            .finish()
    }
}
