//! Public gallery routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::gallery;
use crate::state::AppState;

/// Routes mounted at `/photos`.
///
/// ```text
/// GET /          -> list_photos (?category&lens&page&pageSize&view)
/// GET /recent    -> recent_photos
/// GET /{id}      -> get_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(gallery::list_photos))
        .route("/recent", get(gallery::recent_photos))
        .route("/{id}", get(gallery::get_photo))
}
