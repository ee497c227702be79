//! PrintDesk - Main Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use printdesk_backend::{
    api,
    config::Config,
    error::Result,
    models::user::{NewUser, Role},
    services::auth_service::AuthService,
    services::notify_service::{LogDispatcher, NotificationDispatcher, RelayDispatcher},
    store::MemStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "printdesk_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting PrintDesk");

    // Create the record store and seed the admin account
    let store = Arc::new(MemStore::new());
    provision_admin_user(&store, &config).await?;

    // Pick the notification dispatcher
    let dispatcher: Arc<dyn NotificationDispatcher> = match &config.notify_endpoint {
        Some(endpoint) => {
            tracing::info!(endpoint = %endpoint, "Using notification relay");
            Arc::new(RelayDispatcher::new(
                endpoint.clone(),
                config.notify_api_key.clone(),
                config.notify_from.clone(),
            ))
        }
        None => {
            tracing::info!("No notification relay configured, notifications are log-only");
            Arc::new(LogDispatcher)
        }
    };

    // Create application state
    let state = Arc::new(api::AppState::new(config.clone(), store, dispatcher));

    // Build router
    let app = Router::new()
        .merge(api::routes::create_router(state))
        .layer({
            // In production the frontend is served from the same origin.
            // In development the Vite dev server runs on a different port,
            // so we must whitelist that origin and enable credentials.
            if std::env::var("ENVIRONMENT").unwrap_or_default() == "development" {
                let origins: Vec<_> = std::env::var("CORS_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".into())
                    .split(',')
                    .map(|s| s.trim().parse().expect("invalid CORS origin"))
                    .collect();
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                    .allow_credentials(true)
            } else {
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        })
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.bind_address.parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed the admin account on first boot.
///
/// Credentials come from `ADMIN_USERNAME`/`ADMIN_PASSWORD`; the password
/// is stored as a bcrypt hash.
async fn provision_admin_user(store: &MemStore, config: &Config) -> Result<()> {
    let password_hash = AuthService::hash_password(&config.admin_password)?;

    match store
        .create_user(NewUser {
            username: config.admin_username.clone(),
            password_hash,
            role: Role::Admin,
        })
        .await
    {
        Some(user) => {
            tracing::info!(username = %user.username, "Admin user created");
        }
        None => {
            tracing::warn!(
                username = %config.admin_username,
                "Admin user already present, skipping seed"
            );
        }
    }

    Ok(())
}
