use crate::domain::activity::{RecentActivityEntry, MAX_RECENT_ACTIVITY};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;

/// Per-instance visit counter and recent request log.
///
/// The counter is deliberately never reconciled with the persisted visit
/// count: each instance behind the load balancer reports its own number.
#[derive(Clone)]
pub struct ActivityRecorder {
    server: Arc<str>,
    visits: Arc<AtomicU64>,
    recent: Arc<Mutex<VecDeque<RecentActivityEntry>>>,
}

impl ActivityRecorder {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: Arc::from(server.into()),
            visits: Arc::new(AtomicU64::new(0)),
            recent: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_RECENT_ACTIVITY + 1))),
        }
    }

    pub fn server(&self) -> &str { &self.server }

    pub fn visit_count(&self) -> u64 { self.visits.load(Ordering::SeqCst) }

    /// Bumps the counter by one and returns the new value.
    pub fn record_visit(&self) -> u64 {
        self.visits.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub async fn push_activity(&self, path: &str) {
        let mut log = self.recent.lock().await;
        let count = self.visit_count();
        self.push_locked(&mut log, path, count);
    }

    /// Counts a visit and logs it in one critical section, so the entry
    /// carries exactly the returned value and log order matches counter order.
    pub async fn record_visit_at(&self, path: &str) -> u64 {
        let mut log = self.recent.lock().await;
        let count = self.record_visit();
        self.push_locked(&mut log, path, count);
        count
    }

    fn push_locked(&self, log: &mut VecDeque<RecentActivityEntry>, path: &str, count: u64) {
        log.push_front(RecentActivityEntry {
            path: path.to_string(),
            server_hostname: self.server.to_string(),
            time: OffsetDateTime::now_utc(),
            visit_count_at_time: count,
        });
        log.truncate(MAX_RECENT_ACTIVITY);
    }

    /// Most recent first.
    pub async fn recent_activity(&self) -> Vec<RecentActivityEntry> {
        self.recent.lock().await.iter().cloned().collect()
    }
}
