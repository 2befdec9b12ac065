use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers::{
    create_memo, health, index, list_images, list_memos, recent_requests, summary, track_activity,
    traffic, upload_photo, visit,
};
use crate::config::Config;
use crate::state::AppState;

pub fn build_router(state: AppState, cfg: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/visit", get(visit))
        .route("/stats/summary", get(summary))
        .route("/stats/traffic", get(traffic))
        .route("/memo", post(create_memo).get(list_memos))
        .route("/uploadPhoto", post(upload_photo))
        .route("/images", get(list_images))
        .route("/recent-requests", get(recent_requests))
        .route_layer(middleware::from_fn_with_state(state.clone(), track_activity))
        .layer(DefaultBodyLimit::max(cfg.max_upload_bytes));

    let mut app = api.nest_service("/uploads", ServeDir::new(&cfg.upload_dir));
    if let Some(dir) = &cfg.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors).layer(TraceLayer::new_for_http()).with_state(state)
}
