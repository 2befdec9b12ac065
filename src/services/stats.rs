//! Read-only aggregates over the visit and image tables.
//!
//! Both take the query time explicitly; handlers pass `now_utc()`.

use time::OffsetDateTime;

use crate::domain::records::{Summary, TrafficRow, TRAFFIC_WINDOW};
use crate::error::Result;
use crate::services::database::Database;

const SUMMARY_SQL: &str = "SELECT
    (SELECT COUNT(*) FROM visit_log),
    (SELECT COUNT(DISTINCT client_ip) FROM visit_log),
    (SELECT COUNT(DISTINCT server_hostname) FROM visit_log WHERE visited_at >= ?1 AND visited_at <= ?2),
    (SELECT COUNT(*) FROM uploaded_image)";

// '%Y-%m-%d %H:%M' drops seconds and sorts chronologically as text
const TRAFFIC_SQL: &str = "SELECT
        strftime('%Y-%m-%d %H:%M', visited_at, 'unixepoch') AS minute,
        server_hostname,
        COUNT(*) AS count
    FROM visit_log
    WHERE visited_at >= ?1 AND visited_at <= ?2
    GROUP BY minute, server_hostname
    ORDER BY minute ASC, server_hostname ASC";

fn window(now: OffsetDateTime) -> (i64, i64) {
    ((now - TRAFFIC_WINDOW).unix_timestamp(), now.unix_timestamp())
}

pub async fn compute_summary(db: &Database, now: OffsetDateTime) -> Result<Summary> {
    let (from, to) = window(now);
    let q = sqlx::query_as::<_, (i64, i64, i64, i64)>(SUMMARY_SQL).bind(from).bind(to);
    let (total_visits, unique_visitors, current_servers, image_count) = db.timed(q.fetch_one(db.pool())).await?;
    Ok(Summary { total_visits, unique_visitors, current_servers, image_count })
}

pub async fn compute_traffic_series(db: &Database, now: OffsetDateTime) -> Result<Vec<TrafficRow>> {
    let (from, to) = window(now);
    let q = sqlx::query_as::<_, TrafficRow>(TRAFFIC_SQL).bind(from).bind(to);
    db.timed(q.fetch_all(db.pool())).await
}
