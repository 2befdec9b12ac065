pub mod config;
pub mod telemetry;
pub mod state;
pub mod error;
pub mod domain { pub mod activity; pub mod records; }
pub mod services { pub mod activity; pub mod database; pub mod object_store; pub mod stats; }
pub mod web { pub mod router; pub mod handlers; pub mod utils; }

use std::sync::Arc;

use anyhow::Context;

use crate::services::{activity::ActivityRecorder, database::Database, object_store::LocalObjectStore};
use crate::state::AppState;

pub async fn build_app(cfg: &crate::config::Config) -> anyhow::Result<(axum::Router, Database)> {
    let db = Database::connect(&cfg.database_url, cfg.db_max_connections, cfg.db_timeout).await?;
    db.migrate().await?;

    tokio::fs::create_dir_all(&cfg.upload_dir)
        .await
        .with_context(|| format!("creating upload dir {}", cfg.upload_dir.display()))?;
    let objects = LocalObjectStore::new(&cfg.upload_dir, cfg.public_base_url.clone());

    let state = AppState {
        db: db.clone(),
        objects: Arc::new(objects),
        activity: ActivityRecorder::new(cfg.server_name.clone()),
    };

    Ok((crate::web::router::build_router(state, cfg), db))
}
