//! REST API and static frontend.
//!
//! - `GET|POST /api/memos`, `GET|PUT|DELETE /api/memos/{id}`
//! - `GET /api/tags`
//! - `POST /api/upload`, `GET /api/uploads/{name}`
//! - everything else: the frontend build from `--static-dir`, with
//!   `index.html` as the single-page-app fallback

pub mod error;
pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;

pub use error::ApiError;
pub use routes::AppState;

/// Build the application router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let uploads = ServeDir::new(state.attachments.dir());

    let api = Router::new()
        .route("/memos", get(routes::list_memos).post(routes::create_memo))
        .route(
            "/memos/{id}",
            get(routes::get_memo)
                .put(routes::update_memo)
                .delete(routes::delete_memo),
        )
        .route("/tags", get(routes::list_tags))
        .route("/upload", post(routes::upload))
        .nest_service("/uploads", uploads)
        .fallback(routes::api_not_found)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .with_state(state);

    let mut app = Router::new().nest("/api", api);

    if let Some(static_dir) = &config.static_dir {
        let index = ServeFile::new(static_dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(static_dir).fallback(index));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve until Ctrl-C.
pub async fn serve(
    state: AppState,
    config: &ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(state, config);

    let listener = TcpListener::bind(&config.addr).await?;
    info!(addr = %config.addr, "Listening on http://{}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
