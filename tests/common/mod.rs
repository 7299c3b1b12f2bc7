//! Mock Smart Card backend shared by the integration tests.
//!
//! Serves the Profile / Analytics REST routes on a random port and records
//! what the client sent.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Maximum time any test is allowed to run before we consider it hung.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// The only bearer token the mock accepts.
pub const GOOD_TOKEN: &str = "good-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Default)]
pub struct Recorded {
    pub created: Vec<Value>,
    pub uploads: Vec<UploadedPart>,
    pub tracked: Vec<Value>,
}

pub type Shared = Arc<Mutex<Recorded>>;

/// Start the mock API, return (`/api/v1` base URL, recorder).
pub async fn start_server() -> (String, Shared) {
    let state: Shared = Arc::default();
    let app = Router::new()
        .route("/api/v1/profiles", post(create_profile))
        .route("/api/v1/profiles/upload-avatar", post(upload_avatar))
        .route("/api/v1/profiles/my-profiles", get(my_profiles))
        .route("/api/v1/profiles/{slug}", get(public_profile))
        .route(
            "/api/v1/analytics/profiles/{id}/analytics/export",
            get(export_analytics),
        )
        .route("/api/v1/analytics/track-view", post(track_view))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{port}/api/v1"), state)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {GOOD_TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Unauthorized"})),
    )
        .into_response()
}

async fn create_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let full_name = body["fullName"].as_str().unwrap_or_default().to_string();
    if full_name == "Duplicate" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "Profile already exists"})),
        )
            .into_response();
    }
    state.lock().unwrap().created.push(body);
    Json(json!({
        "profile": {
            "id": "p-1",
            "slug": "jane-doe",
            "fullName": full_name,
            "isPublished": true,
            "profileUrl": "http://localhost:3001/p/jane-doe",
            "qrCodeUrl": "/uploads/qr/p-1.png"
        }
    }))
    .into_response()
}

async fn upload_avatar(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    while let Some(field) = multipart.next_field().await.unwrap() {
        let part = UploadedPart {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().unwrap_or_default().to_string(),
            content_type: field.content_type().unwrap_or_default().to_string(),
            size: 0,
        };
        let size = field.bytes().await.unwrap().len();
        state
            .lock()
            .unwrap()
            .uploads
            .push(UploadedPart { size, ..part });
    }
    Json(json!({"avatarUrl": "/uploads/avatars/jane.jpg"})).into_response()
}

async fn my_profiles(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"message": "Database unavailable"})),
    )
        .into_response()
}

async fn public_profile(Path(slug): Path<String>) -> Response {
    if slug == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Profile not found"})),
        )
            .into_response();
    }
    Json(json!({
        "profile": {
            "id": "p-1",
            "slug": slug,
            "fullName": "Jane Doe",
            "title": "Engineer",
            "isPublished": true,
            "experiences": [
                {"company": "Acme", "position": "Lead", "startDate": "2022-01", "endDate": null}
            ],
            "socialLinks": [
                {"platform": "GITHUB", "url": "https://github.com/jane"}
            ]
        }
    }))
    .into_response()
}

async fn export_analytics(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        [(header::CONTENT_TYPE, "text/csv")],
        format!("profile,date,views\n{id},2024-01-01,3\n"),
    )
        .into_response()
}

async fn track_view(State(state): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    state.lock().unwrap().tracked.push(body);
    StatusCode::CREATED
}
