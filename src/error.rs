use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;

use crate::services::object_store::ObjectStoreError;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("store unavailable")]
    StoreUnavailable(#[from] sqlx::Error),
    #[error("store timed out")]
    StoreTimeout,
    #[error("upload failed")]
    ObjectStore(#[from] ObjectStoreError),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable(_)
            | AppError::StoreTimeout
            | AppError::ObjectStore(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Validation(_) => {}
            AppError::StoreUnavailable(e) => tracing::error!(error = %e, "store query failed"),
            AppError::ObjectStore(e) => tracing::error!(error = %e, "object write failed"),
            AppError::Internal(e) => tracing::error!(error = %e, "internal error"),
            AppError::StoreTimeout => tracing::error!("store query timed out"),
        }
        // only Validation carries caller-visible detail
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
