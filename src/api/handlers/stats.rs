//! Aggregate statistics handler.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::SharedState;
use crate::models::file::FileStatus;
use crate::store::FileFilter;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_files: usize,
    pub downloaded: usize,
    pub pending: usize,
    pub notified: usize,
}

/// Aggregate file counts by status
pub async fn get_stats(State(state): State<SharedState>) -> Json<StatsResponse> {
    let files = state.store.list_files(&FileFilter::default()).await;

    Json(StatsResponse {
        total_files: files.len(),
        downloaded: files
            .iter()
            .filter(|f| f.status == FileStatus::Downloaded)
            .count(),
        pending: files
            .iter()
            .filter(|f| f.status == FileStatus::Uploaded)
            .count(),
        notified: files
            .iter()
            .filter(|f| f.status == FileStatus::Notified)
            .count(),
    })
}
