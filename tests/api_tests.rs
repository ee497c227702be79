//! API integration tests.
//!
//! These tests drive the full router in-process via
//! `tower::ServiceExt::oneshot`; no running server is required.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use printdesk_backend::api::{routes, AppState};
use printdesk_backend::config::Config;
use printdesk_backend::models::user::{NewUser, Role};
use printdesk_backend::services::auth_service::AuthService;
use printdesk_backend::services::notify_service::LogDispatcher;
use printdesk_backend::store::MemStore;

fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".into(),
        admin_username: "admin".into(),
        admin_password: "admin123".into(),
        notify_endpoint: None,
        notify_api_key: None,
        notify_from: "printing@resend.dev".into(),
        notify_timeout_secs: 1,
    }
}

/// Build the app with a fresh store and the seeded admin account.
async fn test_app() -> Router {
    let store = Arc::new(MemStore::new());
    let password_hash = AuthService::hash_password("admin123").unwrap();
    store
        .create_user(NewUser {
            username: "admin".into(),
            password_hash,
            role: Role::Admin,
        })
        .await
        .unwrap();

    let state = Arc::new(AppState::new(test_config(), store, Arc::new(LogDispatcher)));
    routes::create_router(state)
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_file(app: &Router, student_id: &str, file_name: &str) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/api/files",
        Some(json!({
            "studentId": student_id,
            "studentName": "Rahul Sharma",
            "fileName": file_name,
            "fileSize": "2.4 MB",
            "filePath": format!("/uploads/{}", file_name.to_lowercase()),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

fn assert_token_format(token: &str) {
    let body = token.strip_prefix("QC-").expect("token must start with QC-");
    assert!(
        (4..=7).contains(&body.len()),
        "unexpected token body length: {}",
        body
    );
    assert!(
        body.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()),
        "unexpected token charset: {}",
        body
    );
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = test_app().await;
    let (status, body) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn login_succeeds_with_seeded_admin() {
    let app = test_app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({"username": "admin", "password": "admin123"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"]["id"].is_string());
    // The descriptor never carries credential material
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = test_app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({"username": "admin", "password": "wrong"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTH_ERROR");
}

#[tokio::test]
async fn login_requires_credentials() {
    let app = test_app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({"username": "", "password": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn signup_then_login() {
    let app = test_app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/signup",
        Some(json!({"username": "CS21001", "password": "hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "student");

    let (status, _) = request(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({"username": "CS21001", "password": "hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/signup",
        Some(json!({"username": "CS21001", "password": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn created_file_starts_uploaded_without_token() {
    let app = test_app().await;
    let file = create_file(&app, "CS21001", "Assignment_1.pdf").await;

    assert_eq!(file["status"], "uploaded");
    assert_eq!(file["token"], Value::Null);
    assert_eq!(file["downloadDate"], Value::Null);
    assert_eq!(file["studentId"], "CS21001");
    assert_eq!(file["fileName"], "Assignment_1.pdf");
    assert!(file["uploadDate"].is_string());
}

#[tokio::test]
async fn create_file_validates_required_fields() {
    let app = test_app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/files",
        Some(json!({
            "studentId": "",
            "studentName": "Rahul Sharma",
            "fileName": "a.pdf",
            "fileSize": "2.4 MB",
            "filePath": "/uploads/a.pdf",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn listing_is_newest_first() {
    let app = test_app().await;
    let a = create_file(&app, "CS21001", "a.pdf").await;
    let b = create_file(&app, "CS21002", "b.pdf").await;
    let c = create_file(&app, "CS21003", "c.pdf").await;

    let (status, body) = request(&app, "GET", "/api/files", None).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<&Value> = body.as_array().unwrap().iter().map(|f| &f["id"]).collect();
    assert_eq!(ids, vec![&c["id"], &b["id"], &a["id"]]);
}

#[tokio::test]
async fn listing_supports_owner_and_status_filters() {
    let app = test_app().await;
    request(&app, "POST", "/api/files/demo", None).await;

    let (status, body) = request(&app, "GET", "/api/files?studentId=CS21002", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["fileName"], "Project_Report.docx");

    let (status, body) = request(&app, "GET", "/api/files?status=uploaded", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn download_issues_token_and_records_notification() {
    let app = test_app().await;
    let file = create_file(&app, "CS21001", "Assignment_1.pdf").await;
    let id = file["id"].as_str().unwrap();

    let (status, body) =
        request(&app, "POST", &format!("/api/files/{}/download", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "File downloaded and notification sent");

    let token = body["token"].as_str().unwrap();
    assert_token_format(token);
    assert_eq!(body["file"]["status"], "downloaded");
    assert_eq!(body["file"]["token"], token);
    assert!(body["file"]["downloadDate"].is_string());

    let (status, notifications) =
        request(&app, "GET", &format!("/api/files/{}/notifications", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let notifications = notifications.as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["token"], token);
    assert_eq!(notifications[0]["status"], "sent");
    assert!(notifications[0]["message"]
        .as_str()
        .unwrap()
        .contains(token));
}

#[tokio::test]
async fn download_unknown_id_is_not_found() {
    let app = test_app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/files/00000000-0000-4000-8000-000000000000/download",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn second_download_conflicts_and_keeps_token() {
    let app = test_app().await;
    let file = create_file(&app, "CS21001", "a.pdf").await;
    let id = file["id"].as_str().unwrap();

    let (_, first) = request(&app, "POST", &format!("/api/files/{}/download", id), None).await;
    let token = first["token"].as_str().unwrap().to_string();

    let (status, body) =
        request(&app, "POST", &format!("/api/files/{}/download", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (_, listed) = request(&app, "GET", "/api/files", None).await;
    assert_eq!(listed[0]["token"], token.as_str());
}

#[tokio::test]
async fn batch_download_transitions_only_uploaded_files() {
    let app = test_app().await;
    let a = create_file(&app, "CS21001", "a.pdf").await;
    let b = create_file(&app, "CS21002", "b.pdf").await;
    let b_id = b["id"].as_str().unwrap();
    request(&app, "POST", &format!("/api/files/{}/download", b_id), None).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/files/batch-download",
        Some(json!({
            "fileIds": [a["id"], b["id"], "00000000-0000-4000-8000-000000000000"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "1 files downloaded and notifications sent");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["file"]["id"], a["id"]);
    assert_token_format(results[0]["token"].as_str().unwrap());
}

#[tokio::test]
async fn batch_download_rejects_empty_id_list() {
    let app = test_app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/files/batch-download",
        Some(json!({"fileIds": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn delete_removes_file_but_keeps_notification_log() {
    let app = test_app().await;
    let file = create_file(&app, "CS21001", "a.pdf").await;
    let id = file["id"].as_str().unwrap();
    request(&app, "POST", &format!("/api/files/{}/download", id), None).await;

    let (status, body) = request(&app, "DELETE", &format!("/api/files/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "File deleted successfully");

    let (status, _) = request(&app, "DELETE", &format!("/api/files/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = request(&app, "GET", "/api/files", None).await;
    assert!(listed.as_array().unwrap().is_empty());

    // Notifications are an append-only log and survive the delete
    let (_, notifications) =
        request(&app, "GET", &format!("/api/files/{}/notifications", id), None).await;
    assert_eq!(notifications.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn resend_requires_an_issued_token() {
    let app = test_app().await;
    let file = create_file(&app, "CS21001", "a.pdf").await;
    let id = file["id"].as_str().unwrap();

    let (status, body) = request(
        &app,
        "POST",
        &format!("/api/files/{}/resend-notification", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NO_TOKEN");

    request(&app, "POST", &format!("/api/files/{}/download", id), None).await;

    let (status, body) = request(
        &app,
        "POST",
        &format!("/api/files/{}/resend-notification", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Notification resent successfully");

    let (_, notifications) =
        request(&app, "GET", &format!("/api/files/{}/notifications", id), None).await;
    let notifications = notifications.as_array().unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(notifications[1]["message"]
        .as_str()
        .unwrap()
        .starts_with("Reminder:"));
    // Both notifications reference the same token
    assert_eq!(notifications[0]["token"], notifications[1]["token"]);
}

#[tokio::test]
async fn stats_aggregate_counts_by_status() {
    let app = test_app().await;
    let (status, seeded) = request(&app, "POST", "/api/files/demo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seeded["files"].as_array().unwrap().len(), 4);

    let (status, body) = request(&app, "GET", "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalFiles"], 4);
    assert_eq!(body["pending"], 2);
    assert_eq!(body["downloaded"], 1);
    assert_eq!(body["notified"], 1);
}
