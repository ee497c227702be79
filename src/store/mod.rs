//! In-memory record store.
//!
//! Owns all entity storage for the process lifetime. The store is
//! constructed once at startup and passed to request handlers through
//! application state; there is no module-level singleton.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::file::{FileChanges, FileStatus, NewPrintFile, PrintFile};
use crate::models::notification::{NewNotification, Notification};
use crate::models::user::{NewUser, User};

/// Predicate applied to file listings
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    pub student_id: Option<String>,
    pub status: Option<FileStatus>,
}

/// Outcome of a guarded file update.
///
/// The status check, token-uniqueness check, and write all happen under
/// one write lock, so two racing fulfills cannot both pass the guard.
#[derive(Debug)]
pub enum GuardedUpdate {
    Updated(PrintFile),
    Missing,
    StatusMismatch(FileStatus),
    TokenInUse,
}

struct StoredFile {
    /// Creation sequence, breaks timestamp ties in newest-first listings
    seq: u64,
    record: PrintFile,
}

#[derive(Default)]
struct StoreInner {
    users: HashMap<Uuid, User>,
    files: HashMap<Uuid, StoredFile>,
    notifications: Vec<Notification>,
    next_seq: u64,
}

/// In-memory store for users, files, and notifications
pub struct MemStore {
    inner: RwLock<StoreInner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
        }
    }

    /// Create a user. Returns `None` when the username is already taken.
    pub async fn create_user(&self, new: NewUser) -> Option<User> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == new.username) {
            return None;
        }
        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            password_hash: new.password_hash,
            role: new.role,
        };
        inner.users.insert(user.id, user.clone());
        Some(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }

    /// Case-sensitive exact username lookup
    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Create a file record with a fresh id and creation timestamp.
    ///
    /// Status defaults to `Uploaded` unless the payload carries an
    /// explicit one (seed data).
    pub async fn create_file(&self, new: NewPrintFile) -> PrintFile {
        let mut inner = self.inner.write().await;
        let record = PrintFile {
            id: Uuid::new_v4(),
            student_id: new.student_id,
            student_name: new.student_name,
            file_name: new.file_name,
            file_size: new.file_size,
            file_path: new.file_path,
            upload_date: Utc::now(),
            status: new.status.unwrap_or(FileStatus::Uploaded),
            token: new.token,
            download_date: None,
        };
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.files.insert(record.id, StoredFile { seq, record: record.clone() });
        record
    }

    pub async fn get_file(&self, id: Uuid) -> Option<PrintFile> {
        self.inner.read().await.files.get(&id).map(|f| f.record.clone())
    }

    /// List files newest first, optionally filtered by owner or status.
    pub async fn list_files(&self, filter: &FileFilter) -> Vec<PrintFile> {
        let inner = self.inner.read().await;
        let mut matched: Vec<&StoredFile> = inner
            .files
            .values()
            .filter(|f| {
                filter
                    .student_id
                    .as_ref()
                    .is_none_or(|sid| f.record.student_id == *sid)
                    && filter.status.is_none_or(|s| f.record.status == s)
            })
            .collect();
        matched.sort_by(|a, b| {
            b.record
                .upload_date
                .cmp(&a.record.upload_date)
                .then(b.seq.cmp(&a.seq))
        });
        matched.into_iter().map(|f| f.record.clone()).collect()
    }

    /// Merge a partial update into a file record, last-writer-wins per
    /// field. Returns `None` when the id is absent.
    pub async fn update_file(&self, id: Uuid, changes: FileChanges) -> Option<PrintFile> {
        let mut inner = self.inner.write().await;
        let stored = inner.files.get_mut(&id)?;
        apply_changes(&mut stored.record, changes);
        Some(stored.record.clone())
    }

    /// Conditional update: applies `changes` only when the record exists
    /// and its current status equals `expected`. When the changes carry a
    /// token, the token must not already be held by another live record.
    pub async fn update_file_guarded(
        &self,
        id: Uuid,
        expected: FileStatus,
        changes: FileChanges,
    ) -> GuardedUpdate {
        let mut inner = self.inner.write().await;
        let Some(current) = inner.files.get(&id).map(|f| f.record.status) else {
            return GuardedUpdate::Missing;
        };
        if current != expected {
            return GuardedUpdate::StatusMismatch(current);
        }
        if let Some(token) = changes.token.as_deref() {
            let in_use = inner
                .files
                .iter()
                .any(|(fid, f)| *fid != id && f.record.token.as_deref() == Some(token));
            if in_use {
                return GuardedUpdate::TokenInUse;
            }
        }
        match inner.files.get_mut(&id) {
            Some(stored) => {
                apply_changes(&mut stored.record, changes);
                GuardedUpdate::Updated(stored.record.clone())
            }
            None => GuardedUpdate::Missing,
        }
    }

    /// Remove a file record. Returns false when the id is absent; never
    /// errors. Notifications referencing the file are left in the log.
    pub async fn delete_file(&self, id: Uuid) -> bool {
        self.inner.write().await.files.remove(&id).is_some()
    }

    /// Append a notification record to the log.
    pub async fn create_notification(&self, new: NewNotification) -> Notification {
        let mut inner = self.inner.write().await;
        let notification = Notification {
            id: Uuid::new_v4(),
            file_id: new.file_id,
            student_id: new.student_id,
            token: new.token,
            message: new.message,
            sent_date: Utc::now(),
            status: new.status,
        };
        inner.notifications.push(notification.clone());
        notification
    }

    /// Notifications for one file, in the order they were sent.
    pub async fn notifications_for_file(&self, file_id: Uuid) -> Vec<Notification> {
        self.inner
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.file_id == file_id)
            .cloned()
            .collect()
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_changes(record: &mut PrintFile, changes: FileChanges) {
    if let Some(status) = changes.status {
        record.status = status;
    }
    if let Some(token) = changes.token {
        record.token = Some(token);
    }
    if let Some(ts) = changes.download_date {
        record.download_date = Some(ts);
    }
}
