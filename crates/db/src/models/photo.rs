//! Photo row model.

use folio_core::photo::PhotoEntry;
use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PhotoRow {
    pub id: DbId,
    pub caption: String,
    pub description: Option<String>,
    pub category: String,
    pub lens: String,
    pub image_url: String,
    pub uploaded_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PhotoRow> for PhotoEntry {
    fn from(row: PhotoRow) -> Self {
        PhotoEntry {
            id: row.id,
            caption: row.caption,
            description: row.description,
            category: row.category,
            lens: row.lens,
            image_url: row.image_url,
            uploaded_at: row.uploaded_at,
        }
    }
}
