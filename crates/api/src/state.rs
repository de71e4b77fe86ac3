use std::sync::Arc;

use folio_core::admin::CatalogWriter;
use folio_core::contact::MessageRelay;
use folio_core::store::CatalogStore;

use crate::auth::session::SessionRegistry;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Catalog store (Postgres or in-memory).
    pub store: Arc<dyn CatalogStore>,
    /// Upload-then-write sequence for admin submissions.
    pub writer: CatalogWriter,
    /// Contact relay. `None` when neither SMTP nor a form endpoint is configured.
    pub relay: Option<Arc<dyn MessageRelay>>,
    pub config: Arc<ServerConfig>,
    pub sessions: Arc<SessionRegistry>,
}
