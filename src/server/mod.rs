use crate::config::Config;
use crate::media::{default_strategies, MediaRoot, MediaStore};
use crate::streaming::StreamSettings;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod error;
pub mod routes_media;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Resolved media root and data-URL cache
    pub media: Arc<MediaStore>,
    /// Settings for direct file streams
    pub stream_settings: StreamSettings,
}

impl AppContext {
    /// Build the context, resolving the public root from config and defaults.
    pub fn new(config: Config) -> Self {
        let root = MediaRoot::resolve(&default_strategies(&config.media.configured_roots()));
        Self::with_store(config, MediaStore::new(root))
    }

    /// Build the context around an existing store.
    pub fn with_store(config: Config, media: MediaStore) -> Self {
        let stream_settings = StreamSettings {
            chunk_size: config.media.stream_chunk_size,
            cache_max_age_secs: config.media.cache_max_age_secs,
        };
        Self {
            config: Arc::new(config),
            media: Arc::new(media),
            stream_settings,
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, site_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD])
        .allow_headers([header::CONTENT_TYPE, header::RANGE]);

    let mut app = Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(routes_media::media_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Serve the rest of the public root as the site itself.
    // Uses SPA fallback: serves index.html for any route that doesn't match a file
    if let Some(dir) = site_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext::new(config);

    let site_dir = ctx
        .config
        .server
        .serve_site
        .then(|| ctx.media.root().root().to_path_buf());

    let app = create_router(ctx, site_dir);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
