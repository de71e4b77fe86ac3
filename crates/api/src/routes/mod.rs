pub mod admin;
pub mod auth;
pub mod contact;
pub mod health;
pub mod photos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                      login (public)
/// /auth/logout                     logout (requires auth)
/// /auth/me                         current admin (requires auth)
///
/// /photos                          gallery page (public)
/// /photos/recent                   recent strip (public)
/// /photos/{id}                     detail (public)
///
/// /admin/photos                    filtered list, create (admin only)
/// /admin/photos/{id}               update, delete (admin only)
/// /admin/vocabulary                facet options (admin only)
///
/// /contact                         send a visitor message (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/photos", photos::router())
        .nest("/admin", admin::router())
        .nest("/contact", contact::router())
}
