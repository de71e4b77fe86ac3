//! Repository for the `photos` table.

use folio_core::photo::{NewPhoto, PhotoFilter, PhotoPatch};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::photo::PhotoRow;

/// Column list for `photos` queries.
const COLUMNS: &str = "\
    id, caption, description, category, lens, image_url, \
    uploaded_at, created_at, updated_at";

/// Provides data access for catalog photos.
pub struct PhotoRepo;

impl PhotoRepo {
    /// All photos in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<PhotoRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM photos ORDER BY id");
        sqlx::query_as::<_, PhotoRow>(&query).fetch_all(pool).await
    }

    /// Photos matching every supplied equality predicate.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &PhotoFilter,
    ) -> Result<Vec<PhotoRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM photos \
             WHERE ($1::text IS NULL OR category = $1) \
               AND ($2::text IS NULL OR lens = $2) \
             ORDER BY id"
        );
        sqlx::query_as::<_, PhotoRow>(&query)
            .bind(&filter.category)
            .bind(&filter.lens)
            .fetch_all(pool)
            .await
    }

    /// Newest photos by `uploaded_at`.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<PhotoRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM photos ORDER BY uploaded_at DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, PhotoRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PhotoRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM photos WHERE id = $1");
        sqlx::query_as::<_, PhotoRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a photo and return the stored row.
    pub async fn create(pool: &PgPool, input: &NewPhoto) -> Result<PhotoRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO photos (caption, description, category, lens, image_url, uploaded_at) \
             VALUES ($1, NULLIF(btrim($2), ''), $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PhotoRow>(&query)
            .bind(&input.caption)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.lens)
            .bind(&input.image_url)
            .bind(input.uploaded_at)
            .fetch_one(pool)
            .await
    }

    /// Merge the supplied fields. Returns `None` when the id does not exist.
    ///
    /// A supplied blank description clears the column.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &PhotoPatch,
    ) -> Result<Option<PhotoRow>, sqlx::Error> {
        let query = format!(
            "UPDATE photos SET
                caption = COALESCE($2, caption),
                description = CASE WHEN $3::text IS NULL THEN description
                                   ELSE NULLIF(btrim($3), '') END,
                category = COALESCE($4, category),
                lens = COALESCE($5, lens),
                image_url = COALESCE($6, image_url),
                uploaded_at = COALESCE($7, uploaded_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PhotoRow>(&query)
            .bind(id)
            .bind(&input.caption)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.lens)
            .bind(&input.image_url)
            .bind(input.uploaded_at)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a photo. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
