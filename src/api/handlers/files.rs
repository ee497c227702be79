//! File lifecycle handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::models::file::{FileStatus, NewPrintFile, PrintFile};
use crate::models::notification::Notification;
use crate::services::lifecycle_service::FulfillOutcome;
use crate::store::FileFilter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListQuery {
    pub student_id: Option<String>,
    pub status: Option<FileStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDownloadRequest {
    pub file_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub message: String,
    pub token: String,
    pub file: PrintFile,
}

#[derive(Debug, Serialize)]
pub struct BatchDownloadResponse {
    pub message: String,
    pub results: Vec<FulfillOutcome>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DemoResponse {
    pub message: String,
    pub files: Vec<PrintFile>,
}

/// List file records, newest first
pub async fn list_files(
    State(state): State<SharedState>,
    Query(query): Query<FileListQuery>,
) -> Json<Vec<PrintFile>> {
    let filter = FileFilter {
        student_id: query.student_id,
        status: query.status,
    };
    Json(state.store.list_files(&filter).await)
}

/// Create a file record for a submitted print job
pub async fn create_file(
    State(state): State<SharedState>,
    Json(payload): Json<NewPrintFile>,
) -> Result<Json<PrintFile>> {
    let required = [
        ("studentId", &payload.student_id),
        ("studentName", &payload.student_name),
        ("fileName", &payload.file_name),
        ("fileSize", &payload.file_size),
        ("filePath", &payload.file_path),
    ];
    for (name, value) in required {
        if value.is_empty() {
            return Err(AppError::Validation(format!("{} is required", name)));
        }
    }

    Ok(Json(state.store.create_file(payload).await))
}

/// Download a file: issues a pickup token and notifies the student
pub async fn download_file(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DownloadResponse>> {
    let lifecycle = state.create_lifecycle_service();
    let outcome = lifecycle.fulfill(id).await?;

    Ok(Json(DownloadResponse {
        message: "File downloaded and notification sent".to_string(),
        token: outcome.token,
        file: outcome.file,
    }))
}

/// Download every listed file still awaiting download.
///
/// Ids that are missing or already downloaded are skipped; the response
/// contains one entry per file actually transitioned.
pub async fn batch_download(
    State(state): State<SharedState>,
    Json(payload): Json<BatchDownloadRequest>,
) -> Result<Json<BatchDownloadResponse>> {
    if payload.file_ids.is_empty() {
        return Err(AppError::Validation("Invalid file IDs".to_string()));
    }

    let lifecycle = state.create_lifecycle_service();
    let results = lifecycle.fulfill_many(&payload.file_ids).await;

    Ok(Json(BatchDownloadResponse {
        message: format!("{} files downloaded and notifications sent", results.len()),
        results,
    }))
}

/// Delete a file record
pub async fn delete_file(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    let lifecycle = state.create_lifecycle_service();
    lifecycle.delete(id).await?;

    Ok(Json(MessageResponse {
        message: "File deleted successfully".to_string(),
    }))
}

/// Resend the pickup notification for an already-downloaded file
pub async fn resend_notification(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    let lifecycle = state.create_lifecycle_service();
    lifecycle.resend_notification(id).await?;

    Ok(Json(MessageResponse {
        message: "Notification resent successfully".to_string(),
    }))
}

/// Notification log for one file, oldest first.
///
/// Notifications survive file deletion, so the log stays readable for
/// removed records.
pub async fn file_notifications(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Json<Vec<Notification>> {
    Json(state.store.notifications_for_file(id).await)
}

/// Seed sample file records for demos
pub async fn seed_demo_files(State(state): State<SharedState>) -> Json<DemoResponse> {
    let samples = [
        NewPrintFile {
            student_id: "CS21001".into(),
            student_name: "Rahul Sharma".into(),
            file_name: "Assignment_1.pdf".into(),
            file_size: "2.4 MB".into(),
            file_path: "/uploads/assignment_1.pdf".into(),
            status: None,
            token: None,
        },
        NewPrintFile {
            student_id: "CS21002".into(),
            student_name: "Priya Patel".into(),
            file_name: "Project_Report.docx".into(),
            file_size: "1.8 MB".into(),
            file_path: "/uploads/project_report.docx".into(),
            status: Some(FileStatus::Downloaded),
            token: Some("QC-7829".into()),
        },
        NewPrintFile {
            student_id: "CS21003".into(),
            student_name: "Arjun Kumar".into(),
            file_name: "Presentation.pptx".into(),
            file_size: "5.2 MB".into(),
            file_path: "/uploads/presentation.pptx".into(),
            status: None,
            token: None,
        },
        NewPrintFile {
            student_id: "CS21004".into(),
            student_name: "Sneha Singh".into(),
            file_name: "Data_Analysis.xlsx".into(),
            file_size: "3.1 MB".into(),
            file_path: "/uploads/data_analysis.xlsx".into(),
            status: Some(FileStatus::Notified),
            token: Some("QC-7830".into()),
        },
    ];

    let mut files = Vec::with_capacity(samples.len());
    for sample in samples {
        files.push(state.store.create_file(sample).await);
    }

    Json(DemoResponse {
        message: "Sample files created".to_string(),
        files,
    })
}
