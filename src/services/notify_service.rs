//! Notification dispatch.
//!
//! The dispatcher is an external collaborator: given a target, token,
//! and message it attempts delivery and reports a receipt. Callers treat
//! it as best-effort; a failed dispatch never rolls back the lifecycle
//! transition that triggered it.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, Result};

/// Proof of a dispatch attempt accepted by the delivery channel
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    pub delivery_id: Option<String>,
}

/// Notification delivery collaborator
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Attempt to deliver `message` (carrying `token`) to `target`.
    async fn send(&self, target: &str, token: &str, message: &str) -> Result<DispatchReceipt>;
}

/// Dispatcher that POSTs to an email relay endpoint.
///
/// The relay accepts `{from, to, subject, text, token}` with a bearer
/// API key and answers with a delivery id.
pub struct RelayDispatcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

impl RelayDispatcher {
    pub fn new(endpoint: String, api_key: Option<String>, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            from,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RelayResponse {
    id: Option<String>,
}

#[async_trait]
impl NotificationDispatcher for RelayDispatcher {
    async fn send(&self, target: &str, token: &str, message: &str) -> Result<DispatchReceipt> {
        let mut request = self.client.post(&self.endpoint).json(&json!({
            "from": self.from,
            "to": target,
            "subject": "Your Print is Ready!",
            "text": message,
            "token": token,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Dispatch(format!("Relay unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Dispatch(format!(
                "Relay returned status {}",
                response.status()
            )));
        }

        let body: RelayResponse = response.json().await.unwrap_or_default();
        Ok(DispatchReceipt {
            delivery_id: body.id,
        })
    }
}

/// Dispatcher used when no relay endpoint is configured: logs the
/// notification and reports success without a delivery id.
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn send(&self, target: &str, token: &str, message: &str) -> Result<DispatchReceipt> {
        tracing::info!(student = target, token, text = message, "Notification (log-only)");
        Ok(DispatchReceipt { delivery_id: None })
    }
}
