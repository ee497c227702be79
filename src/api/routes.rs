//! Route definitions for the API.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use super::SharedState;

/// Create the main API router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api_routes())
        .with_state(state)
}

/// API routes under `/api`
fn api_routes() -> Router<SharedState> {
    Router::new()
        // Authentication
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/signup", post(handlers::auth::signup))
        // Files and their lifecycle
        .route(
            "/files",
            get(handlers::files::list_files).post(handlers::files::create_file),
        )
        .route("/files/batch-download", post(handlers::files::batch_download))
        .route("/files/demo", post(handlers::files::seed_demo_files))
        .route("/files/:id", delete(handlers::files::delete_file))
        .route("/files/:id/download", post(handlers::files::download_file))
        .route(
            "/files/:id/notifications",
            get(handlers::files::file_notifications),
        )
        .route(
            "/files/:id/resend-notification",
            post(handlers::files::resend_notification),
        )
        // Statistics
        .route("/stats", get(handlers::stats::get_stats))
}
