use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use pantry_upstream::UpstreamError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Upstream call failed; `context` is the message shown to clients.
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: UpstreamError,
    },

    /// Path id is not a recipe id; rejected before calling upstream.
    #[error("{context}: invalid recipe id {id:?}")]
    InvalidId { context: &'static str, id: String },
}

impl ApiError {
    pub fn upstream(context: &'static str, source: UpstreamError) -> Self {
        tracing::error!("{}: {}", context, source);
        ApiError::Upstream { context, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Upstream { context, source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": context,
                    "details": source.details(),
                })),
            )
                .into_response(),
            ApiError::InvalidId { context, id } => {
                tracing::warn!("{}: invalid recipe id {:?}", context, id);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "error": context,
                        "details": format!("Invalid recipe id: {}", id),
                    })),
                )
                    .into_response()
            }
        }
    }
}
