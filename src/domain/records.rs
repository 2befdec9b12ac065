use serde::Serialize;
use std::time::Duration;
use time::OffsetDateTime;

/// Trailing window used by both aggregation queries.
pub const TRAFFIC_WINDOW: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub server_hostname: String,
    pub client_ip: String,
    pub visited_at: OffsetDateTime,
    pub visit_count_at_time: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Memo {
    pub id: i64,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadedImage {
    pub id: i64,
    pub image_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub total_visits: i64,
    pub unique_visitors: i64,
    pub current_servers: i64,
    pub image_count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, sqlx::FromRow)]
pub struct TrafficRow {
    pub minute: String,
    pub server_hostname: String,
    pub count: i64,
}
