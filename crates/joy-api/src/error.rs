use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use joy_processing::ProcessingError;
use joy_store::StoreError;
use serde_json::json;
use thiserror::Error;

use crate::filters::FilterError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Query param 'name' is required.")]
    MissingName,
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("Episode not found.")]
    EpisodeNotFound,
    #[error("No episodes found matching the given filters.")]
    NoMatches,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Document(#[from] ProcessingError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingName | ApiError::Filter(_) => StatusCode::BAD_REQUEST,
            ApiError::EpisodeNotFound | ApiError::NoMatches => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Document(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
