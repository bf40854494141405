//! uplink: an HTTP relay that forwards uploads into a Google Drive folder
//! tree, makes them publicly readable, and hands back a shareable link.
//!
//! The moving parts are small:
//!
//! - [`drive`]: the remote storage boundary - the [`drive::DriveClient`]
//!   trait, the Google implementation, and folder-path resolution
//! - [`api`]: the two route handlers (`POST /upload`, `POST /delete`) and
//!   their request/response models
//! - [`config`]: YAML + environment configuration via figment
//!
//! Nothing is persisted locally; the remote service is the system of record
//! and each request stands alone.

pub mod api;
pub mod config;
pub mod drive;
pub mod errors;
pub mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;
pub use types::{FileId, FolderId};

use drive::{DriveClient, GoogleDriveClient};
use openapi::ApiDoc;

/// Extra body-limit allowance over the configured file size. The limit
/// bounds the whole multipart body, so a file of exactly
/// `upload.max_file_size` bytes still fits alongside the boundaries and the
/// `path` field.
const MULTIPART_OVERHEAD_ALLOWANCE: usize = 64 * 1024;

/// Application state shared across all request handlers.
///
/// Holds the configuration and the authenticated Drive client. The client is
/// process-wide state, initialized once before request handling begins; no
/// per-request teardown is needed.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub drive: Arc<dyn DriveClient>,
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origins = &config.cors.allowed_origins;
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let mut values = Vec::with_capacity(origins.len());
        for origin in origins {
            values.push(origin.parse::<HeaderValue>()?);
        }
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new().allow_origin(allow_origin).allow_methods(Any).allow_headers(Any))
}

/// Build the application router: the two transfer routes, a health check,
/// rendered API docs, CORS and request tracing.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors_layer = create_cors_layer(&state.config)?;

    // Upload route gets its body limit from config (other routes use the default)
    let upload_limit = state.config.upload.max_file_size as usize + MULTIPART_OVERHEAD_ALLOWANCE;
    let upload_router = Router::new().route(
        "/upload",
        post(api::handlers::transfers::upload).layer(DefaultBodyLimit::max(upload_limit)),
    );

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(upload_router)
        .route("/delete", post(api::handlers::transfers::delete))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

/// The relay application.
///
/// 1. **Create**: [`Application::new`] builds the authenticated Drive client
///    from configuration and wires up the router
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance against the real Drive backend
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let drive: Arc<dyn DriveClient> = Arc::new(GoogleDriveClient::new(config.drive.clone()));
        Self::with_drive(config, drive)
    }

    /// Create an application with an explicit Drive client (used by tests)
    pub fn with_drive(config: Config, drive: Arc<dyn DriveClient>) -> anyhow::Result<Self> {
        let state = AppState {
            config: config.clone(),
            drive,
        };
        let router = build_router(state)?;
        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("uplink listening on http://{bind_addr}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
