use std::{path::PathBuf, str::FromStr, time::Duration};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout: Duration,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    pub static_dir: Option<PathBuf>,
    pub server_name: String,
}
fn default_port() -> u16 { 3000 }
fn default_database_url() -> String { "sqlite://cloud-dash.db?mode=rwc".into() }
fn default_max_connections() -> u32 { 10 }
fn default_timeout_ms() -> u64 { 3000 }
fn default_max_upload() -> usize { 10 * 1024 * 1024 }

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let port = parsed::<u16>("PORT").unwrap_or(default_port());
        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| default_database_url());
        let db_max_connections = parsed::<u32>("DB_MAX_CONNECTIONS").filter(|n| *n > 0).unwrap_or(default_max_connections());
        let db_timeout = Duration::from_millis(parsed::<u64>("DB_TIMEOUT_MS").unwrap_or(default_timeout_ms()));
        let upload_dir = std::env::var("UPLOAD_DIR").map(PathBuf::from).unwrap_or_else(|_| "uploads".into());
        let public_base_url = std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));
        let max_upload_bytes = parsed::<usize>("MAX_UPLOAD_BYTES").unwrap_or(default_max_upload());
        let static_dir = std::env::var("STATIC_DIR").ok().filter(|s| !s.is_empty()).map(PathBuf::from);
        let server_name = std::env::var("SERVER_NAME")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| gethostname::gethostname().to_string_lossy().to_string());
        Ok(Self {
            port, database_url, db_max_connections, db_timeout, upload_dir,
            public_base_url, max_upload_bytes, static_dir, server_name,
        })
    }
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => { warn!(%key, value = %raw, "unparseable value, using default"); None }
    }
}
