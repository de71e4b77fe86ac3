//! Catalog Store Adapter contract.
//!
//! A thin collection-style interface over the document store. Both the admin
//! workflow and the gallery engine read and write exclusively through it.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::photo::{NewPhoto, PhotoEntry, PhotoFilter, PhotoPatch};
use crate::types::DbId;

/// Number of entries in the home-page recent strip.
pub const RECENT_LIMIT: usize = 6;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Unfiltered snapshot. Transport errors surface as `StoreUnavailable`.
    async fn list_all(&self) -> Result<Vec<PhotoEntry>, CoreError>;

    /// Snapshot narrowed by the store itself.
    async fn list_filtered(&self, filter: &PhotoFilter) -> Result<Vec<PhotoEntry>, CoreError>;

    /// Fails with `NotFound` when `id` is absent.
    async fn get_by_id(&self, id: DbId) -> Result<PhotoEntry, CoreError>;

    /// Persist a new entry and return its store-assigned id.
    async fn insert(&self, photo: &NewPhoto) -> Result<DbId, CoreError>;

    /// Merge only the supplied fields. Fails with `NotFound` when `id` is absent.
    async fn update(&self, id: DbId, patch: &PhotoPatch) -> Result<(), CoreError>;

    /// Remove permanently. Deleting an absent id is not an error.
    async fn delete(&self, id: DbId) -> Result<(), CoreError>;

    /// Most recent entries by `uploaded_at`, newest first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<PhotoEntry>, CoreError> {
        let mut entries = self.list_all().await?;
        entries.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Reachability probe for health checks.
    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
