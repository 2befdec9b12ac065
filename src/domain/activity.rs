use serde::Serialize;
use time::OffsetDateTime;

pub const MAX_RECENT_ACTIVITY: usize = 20;

/// One request as seen by this instance. Lives only in process memory.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentActivityEntry {
    pub path: String,
    pub server_hostname: String,
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    pub visit_count_at_time: u64,
}
