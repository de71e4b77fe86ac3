//! Route definitions for catalog administration.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin_photos;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires an admin token.
///
/// ```text
/// GET    /photos          -> list_photos (?category&lens)
/// POST   /photos          -> create_photo (multipart)
/// PUT    /photos/{id}     -> update_photo (multipart)
/// DELETE /photos/{id}     -> delete_photo
/// GET    /vocabulary      -> vocabulary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/photos",
            get(admin_photos::list_photos).post(admin_photos::create_photo),
        )
        .route(
            "/photos/{id}",
            put(admin_photos::update_photo).delete(admin_photos::delete_photo),
        )
        .route("/vocabulary", get(admin_photos::vocabulary))
}
