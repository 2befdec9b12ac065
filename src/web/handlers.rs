use std::net::SocketAddr;

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, ConnectInfo, Multipart, Request, State,
    },
    http::HeaderMap,
    middleware::Next,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::domain::activity::RecentActivityEntry;
use crate::domain::records::{Memo, Summary, TrafficRow, UploadedImage, VisitEvent};
use crate::error::{AppError, Result};
use crate::services::{object_store::image_key, stats};
use crate::state::AppState;
use crate::web::utils::{client_ip, logs_activity};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    message: &'static str,
    server: String,
    visit_count: u64,
    #[serde(with = "time::serde::rfc3339")]
    time: OffsetDateTime,
}

#[derive(Serialize)]
pub struct VisitReply {
    visit_count: u64,
    server: String,
    #[serde(with = "time::serde::rfc3339")]
    time: OffsetDateTime,
}

#[derive(Deserialize)]
pub struct NewMemo {
    #[serde(default)]
    content: String,
}

#[derive(Serialize)]
pub struct MemoCreated {
    ok: bool,
    id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Uploaded {
    image_url: String,
}

pub async fn index(State(state): State<AppState>) -> Json<Identity> {
    Json(Identity {
        message: "Cloud project backend server is running!",
        server: state.activity.server().to_string(),
        visit_count: state.activity.visit_count(),
        time: OffsetDateTime::now_utc(),
    })
}

pub async fn health() -> &'static str { "OK" }

pub async fn visit(
    State(state): State<AppState>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
) -> Result<Json<VisitReply>> {
    let count = state.activity.record_visit_at("/visit").await;

    let now = OffsetDateTime::now_utc();
    let event = VisitEvent {
        server_hostname: state.activity.server().to_string(),
        client_ip: client_ip(&headers, peer.map(|ConnectInfo(addr)| addr)),
        visited_at: now,
        visit_count_at_time: count,
    };
    state.db.insert_visit(&event).await?;
    info!(server = %event.server_hostname, client = %event.client_ip, visit_count = count, "visit");

    Ok(Json(VisitReply { visit_count: count, server: event.server_hostname, time: now }))
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<Summary>> {
    Ok(Json(stats::compute_summary(&state.db, OffsetDateTime::now_utc()).await?))
}

pub async fn traffic(State(state): State<AppState>) -> Result<Json<Vec<TrafficRow>>> {
    Ok(Json(stats::compute_traffic_series(&state.db, OffsetDateTime::now_utc()).await?))
}

pub async fn create_memo(
    State(state): State<AppState>,
    body: std::result::Result<Json<NewMemo>, JsonRejection>,
) -> Result<Json<MemoCreated>> {
    let Json(memo) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    if memo.content.trim().is_empty() {
        return Err(AppError::Validation("content must not be empty".into()));
    }
    let id = state.db.insert_memo(&memo.content, OffsetDateTime::now_utc()).await?;
    info!(id, "memo saved");
    Ok(Json(MemoCreated { ok: true, id }))
}

pub async fn list_memos(State(state): State<AppState>) -> Result<Json<Vec<Memo>>> {
    Ok(Json(state.db.list_memos().await?))
}

pub async fn upload_photo(
    State(state): State<AppState>,
    form: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Uploaded>> {
    let mut form = form.map_err(|e| AppError::Validation(e.body_text()))?;
    let mut image = None;
    while let Some(field) = form.next_field().await.map_err(|e| AppError::Validation(e.body_text()))? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let bytes = field.bytes().await.map_err(|e| AppError::Validation(e.body_text()))?;
        image = Some((file_name, content_type, bytes));
        break;
    }

    let Some((file_name, content_type, bytes)) = image.filter(|(_, _, b)| !b.is_empty()) else {
        return Err(AppError::Validation("no image file uploaded".into()));
    };

    let key = image_key(file_name.as_deref());
    let image_url = state.objects.put(&key, &content_type, &bytes).await?;
    let id = state.db.insert_image(&image_url, OffsetDateTime::now_utc()).await?;
    info!(id, %key, size = bytes.len(), "image uploaded");
    Ok(Json(Uploaded { image_url }))
}

pub async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<UploadedImage>>> {
    Ok(Json(state.db.list_images().await?))
}

pub async fn recent_requests(State(state): State<AppState>) -> Json<Vec<RecentActivityEntry>> {
    Json(state.activity.recent_activity().await)
}

/// Records matched requests in arrival order, before the handler runs.
pub async fn track_activity(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    if logs_activity(&path) {
        state.activity.push_activity(&path).await;
    }
    next.run(req).await
}
