//! File lifecycle engine.
//!
//! Drives the `uploaded -> downloaded` transition: issues a pickup token,
//! advances the status, and emits a notification. The engine computes the
//! next legal record state and delegates persistence to the store; the
//! status check and write happen atomically through the store's guarded
//! update, so concurrent fulfills cannot issue two tokens for one record.
//!
//! Ordering is persist-then-notify: the record update and the
//! notification log entry are visible before the dispatcher is invoked,
//! and dispatcher failure never rolls them back.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::file::{FileChanges, FileStatus, PrintFile};
use crate::models::notification::{NewNotification, Notification, NotificationStatus};
use crate::services::notify_service::NotificationDispatcher;
use crate::store::{GuardedUpdate, MemStore};

/// Attempts at generating a collision-free token before giving up
const MAX_TOKEN_ATTEMPTS: usize = 16;

/// A fulfilled file together with the token issued for it
#[derive(Debug, Clone, Serialize)]
pub struct FulfillOutcome {
    pub file: PrintFile,
    pub token: String,
}

/// File lifecycle service
pub struct LifecycleService {
    store: Arc<MemStore>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    notify_timeout: Duration,
}

impl LifecycleService {
    /// Create a new lifecycle service
    pub fn new(
        store: Arc<MemStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            store,
            dispatcher,
            notify_timeout,
        }
    }

    /// Fulfill one file: issue a token, advance `uploaded -> downloaded`,
    /// append a notification record, and dispatch it best-effort.
    ///
    /// Fails with `NotFound` for an unknown id and `Conflict` when the
    /// file has already been fulfilled. On success the updated record and
    /// its token are returned together.
    pub async fn fulfill(&self, id: Uuid) -> Result<FulfillOutcome> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = generate_token();
            let changes = FileChanges {
                status: Some(FileStatus::Downloaded),
                token: Some(token.clone()),
                download_date: Some(chrono::Utc::now()),
            };

            match self
                .store
                .update_file_guarded(id, FileStatus::Uploaded, changes)
                .await
            {
                GuardedUpdate::Updated(file) => {
                    let message = format!(
                        "Your file {} has been downloaded. Collection token: {}",
                        file.file_name, token
                    );
                    self.notify(&file, &token, message).await;
                    return Ok(FulfillOutcome { file, token });
                }
                GuardedUpdate::Missing => {
                    return Err(AppError::NotFound("File not found".to_string()));
                }
                GuardedUpdate::StatusMismatch(status) => {
                    return Err(AppError::Conflict(format!(
                        "File is not awaiting download (status: {:?})",
                        status
                    )));
                }
                GuardedUpdate::TokenInUse => continue,
            }
        }

        Err(AppError::Internal(
            "Could not allocate a unique collection token".to_string(),
        ))
    }

    /// Fulfill every id whose current status is exactly `uploaded`.
    ///
    /// Missing and already-fulfilled ids are skipped, not errors; the
    /// result contains one entry per file actually transitioned.
    pub async fn fulfill_many(&self, ids: &[Uuid]) -> Vec<FulfillOutcome> {
        let mut results = Vec::new();
        for &id in ids {
            match self.fulfill(id).await {
                Ok(outcome) => results.push(outcome),
                Err(AppError::NotFound(_)) | Err(AppError::Conflict(_)) => {
                    tracing::debug!(file_id = %id, "Skipping file in batch download");
                }
                Err(e) => {
                    tracing::warn!(file_id = %id, error = %e, "Batch download entry failed");
                }
            }
        }
        results
    }

    /// Append a reminder notification carrying the already-issued token.
    ///
    /// Does not mutate the file record. Fails with `NotFound` for an
    /// unknown id and `TokenMissing` when no token has been issued yet.
    pub async fn resend_notification(&self, id: Uuid) -> Result<Notification> {
        let file = self
            .store
            .get_file(id)
            .await
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let token = file.token.clone().ok_or_else(|| {
            AppError::TokenMissing("No collection token has been issued for this file".to_string())
        })?;

        let message = format!(
            "Reminder: Your file {} has been downloaded. Collection token: {}",
            file.file_name, token
        );
        Ok(self.notify(&file, &token, message).await)
    }

    /// Remove a file record. Fails with `NotFound` if absent.
    ///
    /// Notifications are an append-only log and are not cascade-deleted.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self.store.delete_file(id).await {
            Ok(())
        } else {
            Err(AppError::NotFound("File not found".to_string()))
        }
    }

    /// Append a notification record, then attempt delivery under a
    /// bounded timeout. The record is visible before the dispatcher runs;
    /// dispatch failure is logged, never propagated.
    async fn notify(&self, file: &PrintFile, token: &str, message: String) -> Notification {
        let notification = self
            .store
            .create_notification(NewNotification {
                file_id: file.id,
                student_id: file.student_id.clone(),
                token: token.to_string(),
                message: message.clone(),
                status: NotificationStatus::Sent,
            })
            .await;

        let send = self.dispatcher.send(&file.student_id, token, &message);
        match tokio::time::timeout(self.notify_timeout, send).await {
            Ok(Ok(receipt)) => {
                tracing::debug!(
                    file_id = %file.id,
                    delivery_id = ?receipt.delivery_id,
                    "Notification dispatched"
                );
            }
            Ok(Err(e)) => {
                tracing::warn!(file_id = %file.id, error = %e, "Notification dispatch failed");
            }
            Err(_) => {
                tracing::warn!(
                    file_id = %file.id,
                    timeout_secs = self.notify_timeout.as_secs(),
                    "Notification dispatch timed out"
                );
            }
        }

        notification
    }
}

/// Generate a pickup token: `QC-` plus four uppercase hex digits and a
/// 0-999 decimal suffix. Short enough to type at the counter.
fn generate_token() -> String {
    let mut rng = rand::rng();
    let word: u16 = rng.random();
    let suffix: u16 = rng.random_range(0..1000);
    format!("QC-{:04X}{}", word, suffix)
}
