use crate::services::activity::ActivityRecorder;
use crate::services::database::Database;
use crate::services::object_store::ObjectStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub objects: Arc<dyn ObjectStore>,
    pub activity: ActivityRecorder,
}
