//! Public catalog endpoints: gallery page, recent strip, detail.

use axum::extract::{Path, Query, State};
use axum::Json;
use folio_core::gallery::{query_gallery, GalleryPage};
use folio_core::photo::PhotoEntry;
use folio_core::store::RECENT_LIMIT;
use folio_core::types::DbId;

use crate::error::AppResult;
use crate::query::GalleryParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/photos
///
/// Fetches the full catalog and filters/paginates it, so the facet lists in
/// the response always come from the unfiltered set.
pub async fn list_photos(
    State(state): State<AppState>,
    Query(params): Query<GalleryParams>,
) -> AppResult<Json<DataResponse<GalleryPage>>> {
    let query = params.into_query();
    let entries = state.store.list_all().await?;
    let page = query_gallery(&entries, &query);

    tracing::debug!(
        category = ?query.category,
        lens = ?query.lens,
        page = page.pagination.page,
        filtered = page.filtered_count,
        total = page.total_count,
        "Gallery page served"
    );

    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/photos/recent
pub async fn recent_photos(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PhotoEntry>>>> {
    let entries = state.store.list_recent(RECENT_LIMIT).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/photos/{id}
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PhotoEntry>>> {
    let entry = state.store.get_by_id(id).await?;
    Ok(Json(DataResponse { data: entry }))
}
