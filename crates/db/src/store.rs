//! `CatalogStore` adapter over Postgres.

use async_trait::async_trait;
use folio_core::error::CoreError;
use folio_core::photo::{NewPhoto, PhotoEntry, PhotoFilter, PhotoPatch, PHOTO_ENTITY};
use folio_core::store::CatalogStore;
use folio_core::types::DbId;

use crate::repositories::PhotoRepo;
use crate::DbPool;

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: DbPool,
}

impl PgCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a driver error onto the core taxonomy.
///
/// Constraint violations mean the payload slipped past validation; anything
/// else is treated as the store being unreachable.
fn store_error(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_check_violation() => {
            CoreError::Validation(db.message().to_string())
        }
        _ => {
            tracing::error!(error = %err, "Catalog store query failed");
            CoreError::StoreUnavailable(err.to_string())
        }
    }
}

fn into_entries(rows: Vec<crate::models::photo::PhotoRow>) -> Vec<PhotoEntry> {
    rows.into_iter().map(PhotoEntry::from).collect()
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_all(&self) -> Result<Vec<PhotoEntry>, CoreError> {
        PhotoRepo::list(&self.pool)
            .await
            .map(into_entries)
            .map_err(store_error)
    }

    async fn list_filtered(&self, filter: &PhotoFilter) -> Result<Vec<PhotoEntry>, CoreError> {
        PhotoRepo::list_filtered(&self.pool, filter)
            .await
            .map(into_entries)
            .map_err(store_error)
    }

    async fn get_by_id(&self, id: DbId) -> Result<PhotoEntry, CoreError> {
        PhotoRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?
            .map(PhotoEntry::from)
            .ok_or(CoreError::NotFound {
                entity: PHOTO_ENTITY,
                id,
            })
    }

    async fn insert(&self, photo: &NewPhoto) -> Result<DbId, CoreError> {
        photo.validate()?;
        let row = PhotoRepo::create(&self.pool, photo)
            .await
            .map_err(store_error)?;
        Ok(row.id)
    }

    async fn update(&self, id: DbId, patch: &PhotoPatch) -> Result<(), CoreError> {
        patch.validate()?;
        PhotoRepo::update(&self.pool, id, patch)
            .await
            .map_err(store_error)?
            .map(|_| ())
            .ok_or(CoreError::NotFound {
                entity: PHOTO_ENTITY,
                id,
            })
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let removed = PhotoRepo::delete(&self.pool, id)
            .await
            .map_err(store_error)?;
        if !removed {
            tracing::debug!(photo_id = id, "Delete of absent photo ignored");
        }
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<PhotoEntry>, CoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        PhotoRepo::list_recent(&self.pool, limit)
            .await
            .map(into_entries)
            .map_err(store_error)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(store_error)
    }
}
