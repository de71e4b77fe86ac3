//! In-process [`CatalogStore`] backed by an ordered map.
//!
//! Used when no database is configured and by tests that need a real store
//! without external services. Ids are assigned from a monotonically
//! increasing counter and are never reused.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::photo::{NewPhoto, PhotoEntry, PhotoFilter, PhotoPatch, PHOTO_ENTITY};
use crate::store::CatalogStore;
use crate::types::DbId;

pub struct MemoryCatalogStore {
    entries: RwLock<BTreeMap<DbId, PhotoEntry>>,
    next_id: AtomicI64,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_all(&self) -> Result<Vec<PhotoEntry>, CoreError> {
        Ok(self.entries.read().await.values().cloned().collect())
    }

    async fn list_filtered(&self, filter: &PhotoFilter) -> Result<Vec<PhotoEntry>, CoreError> {
        Ok(self
            .entries
            .read()
            .await
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: DbId) -> Result<PhotoEntry, CoreError> {
        self.entries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: PHOTO_ENTITY,
                id,
            })
    }

    async fn insert(&self, photo: &NewPhoto) -> Result<DbId, CoreError> {
        photo.validate()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.entries
            .write()
            .await
            .insert(id, photo.clone().into_entry(id));
        Ok(id)
    }

    async fn update(&self, id: DbId, patch: &PhotoPatch) -> Result<(), CoreError> {
        patch.validate()?;
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&id).ok_or(CoreError::NotFound {
            entity: PHOTO_ENTITY,
            id,
        })?;
        patch.apply_to(entry);
        Ok(())
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        self.entries.write().await.remove(&id);
        Ok(())
    }
}
