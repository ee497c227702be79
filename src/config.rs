//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Server bind address (host:port)
    pub bind_address: String,

    /// Username for the seeded admin account
    pub admin_username: String,

    /// Password for the seeded admin account
    pub admin_password: String,

    /// Notification relay endpoint URL (optional; log-only dispatch when unset)
    pub notify_endpoint: Option<String>,

    /// API key for the notification relay
    pub notify_api_key: Option<String>,

    /// Sender address reported to the notification relay
    pub notify_from: String,

    /// Upper bound on a single notification dispatch, in seconds
    pub notify_timeout_secs: u64,
}

redacted_debug!(Config {
    show bind_address,
    show admin_username,
    redact admin_password,
    show notify_endpoint,
    redact_option notify_api_key,
    show notify_from,
    show notify_timeout_secs,
});

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
            notify_endpoint: env::var("NOTIFY_ENDPOINT").ok(),
            notify_api_key: env::var("NOTIFY_API_KEY").ok(),
            notify_from: env::var("NOTIFY_FROM").unwrap_or_else(|_| "printing@resend.dev".into()),
            notify_timeout_secs: env::var("NOTIFY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".into())
                .parse()
                .unwrap_or(5),
        }
    }
}
