//! Print file model.
//!
//! A file record tracks one submitted print job through the
//! `uploaded -> downloaded` lifecycle. The wire format uses camelCase
//! field names to match the web client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a print file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Submitted by a student, waiting for staff
    Uploaded,
    /// Downloaded by staff; a pickup token has been issued
    Downloaded,
    /// Student has been notified out of band
    Notified,
}

/// Print file entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintFile {
    pub id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub file_name: String,
    pub file_size: String,
    pub file_path: String,
    pub upload_date: DateTime<Utc>,
    pub status: FileStatus,
    /// Pickup token; set exactly once when the file is fulfilled, never reset
    pub token: Option<String>,
    pub download_date: Option<DateTime<Utc>>,
}

/// Payload for creating a print file record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrintFile {
    pub student_id: String,
    pub student_name: String,
    pub file_name: String,
    pub file_size: String,
    pub file_path: String,
    /// Explicit initial status (defaults to `Uploaded`); used by seed data
    #[serde(default)]
    pub status: Option<FileStatus>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Partial update applied to a print file record.
///
/// Unset fields are left untouched; set fields are last-writer-wins.
#[derive(Debug, Clone, Default)]
pub struct FileChanges {
    pub status: Option<FileStatus>,
    pub token: Option<String>,
    pub download_date: Option<DateTime<Utc>>,
}
