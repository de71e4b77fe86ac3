use std::net::SocketAddr;
use std::sync::Arc;

use folio_api::auth::session::SessionRegistry;
use folio_api::config::ServerConfig;
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_api::upload::build_uploader;
use folio_core::admin::CatalogWriter;
use folio_core::contact::MessageRelay;
use folio_core::memory::MemoryCatalogStore;
use folio_core::store::CatalogStore;
use folio_relay::{EmailConfig, EmailRelay, FormRelay};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Catalog store ---
    let store: Arc<dyn CatalogStore> = match &config.database_url {
        Some(database_url) => {
            let pool = folio_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            folio_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            folio_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(folio_db::PgCatalogStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory catalog (data is lost on restart)");
            Arc::new(MemoryCatalogStore::new())
        }
    };

    // --- Upload adapter ---
    let uploader = build_uploader(&config.upload).expect("Failed to build upload adapter");
    tracing::info!(upload = ?config.upload, "Upload adapter ready");

    // --- Contact relay ---
    let relay: Option<Arc<dyn MessageRelay>> = if let Some(email) = EmailConfig::from_env() {
        tracing::info!(smtp_host = %email.smtp_host, "Contact messages relayed by email");
        Some(Arc::new(EmailRelay::new(email)))
    } else if let Some(url) = &config.contact_form_url {
        let relay = FormRelay::new(url.clone()).expect("Failed to build contact form relay");
        tracing::info!(endpoint = %relay.endpoint(), "Contact messages relayed to form endpoint");
        Some(Arc::new(relay))
    } else {
        tracing::warn!("No contact relay configured; POST /api/v1/contact will fail");
        None
    };

    let state = AppState {
        writer: CatalogWriter::new(Arc::clone(&store), uploader),
        store,
        relay,
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionRegistry::new()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be a valid IP address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
