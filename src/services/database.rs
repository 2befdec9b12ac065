use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use time::OffsetDateTime;
use tracing::info;

use crate::domain::records::{Memo, UploadedImage, VisitEvent};
use crate::error::{AppError, Result};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS visit_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        server_hostname TEXT NOT NULL,
        client_ip TEXT NOT NULL,
        visited_at INTEGER NOT NULL,
        visit_count_at_time INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_visit_log_visited_at ON visit_log (visited_at)",
    "CREATE TABLE IF NOT EXISTS memo (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        content TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS uploaded_image (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        image_url TEXT NOT NULL,
        uploaded_at INTEGER NOT NULL
    )",
];

/// Pooled handle to the relational store. Timestamps are stored as unix seconds.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    timeout: Duration,
}

impl Database {
    pub async fn connect(url: &str, max_connections: u32, timeout: Duration) -> anyhow::Result<Self> {
        let opts = SqliteConnectOptions::from_str(url)
            .with_context(|| "invalid DATABASE_URL")?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(timeout)
            .connect_with(opts)
            .await
            .context("connecting to database")?;
        info!(max_connections, "database pool ready");
        Ok(Self { pool, timeout })
    }

    /// Single-connection in-memory store; the pool never recycles it so data survives.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(3);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .acquire_timeout(timeout)
            .connect("sqlite::memory:")
            .await?;
        let db = Self { pool, timeout };
        db.migrate().await?;
        Ok(db)
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        for stmt in SCHEMA {
            sqlx::query(stmt).execute(&self.pool).await.context("applying schema")?;
        }
        Ok(())
    }

    pub(crate) fn pool(&self) -> &SqlitePool { &self.pool }

    /// Runs a store call under the configured deadline.
    pub(crate) async fn timed<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(sqlx::Error::PoolTimedOut)) | Err(_) => Err(AppError::StoreTimeout),
            Ok(Err(e)) => Err(e.into()),
        }
    }

    pub async fn ping(&self) -> Result<()> {
        self.timed(sqlx::query("SELECT 1").execute(&self.pool)).await.map(|_| ())
    }

    pub async fn insert_visit(&self, ev: &VisitEvent) -> Result<()> {
        let q = sqlx::query(
            "INSERT INTO visit_log (server_hostname, client_ip, visited_at, visit_count_at_time)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&ev.server_hostname)
        .bind(&ev.client_ip)
        .bind(ev.visited_at.unix_timestamp())
        .bind(ev.visit_count_at_time as i64);
        self.timed(q.execute(&self.pool)).await?;
        Ok(())
    }

    pub async fn insert_memo(&self, content: &str, at: OffsetDateTime) -> Result<i64> {
        let q = sqlx::query("INSERT INTO memo (content, created_at) VALUES (?, ?)")
            .bind(content)
            .bind(at.unix_timestamp());
        let done = self.timed(q.execute(&self.pool)).await?;
        Ok(done.last_insert_rowid())
    }

    pub async fn list_memos(&self) -> Result<Vec<Memo>> {
        let q = sqlx::query_as::<_, (i64, String, i64)>(
            "SELECT id, content, created_at FROM memo ORDER BY id DESC",
        );
        let rows = self.timed(q.fetch_all(&self.pool)).await?;
        rows.into_iter()
            .map(|(id, content, ts)| from_unix(ts).map(|created_at| Memo { id, content, created_at }))
            .collect()
    }

    pub async fn insert_image(&self, image_url: &str, at: OffsetDateTime) -> Result<i64> {
        let q = sqlx::query("INSERT INTO uploaded_image (image_url, uploaded_at) VALUES (?, ?)")
            .bind(image_url)
            .bind(at.unix_timestamp());
        let done = self.timed(q.execute(&self.pool)).await?;
        Ok(done.last_insert_rowid())
    }

    pub async fn list_images(&self) -> Result<Vec<UploadedImage>> {
        let q = sqlx::query_as::<_, (i64, String, i64)>(
            "SELECT id, image_url, uploaded_at FROM uploaded_image ORDER BY id DESC",
        );
        let rows = self.timed(q.fetch_all(&self.pool)).await?;
        rows.into_iter()
            .map(|(id, image_url, ts)| from_unix(ts).map(|uploaded_at| UploadedImage { id, image_url, uploaded_at }))
            .collect()
    }

    pub async fn close(&self) { self.pool.close().await }
}

fn from_unix(ts: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(ts).map_err(|e| AppError::Internal(anyhow::anyhow!("bad timestamp {ts}: {e}")))
}
