//! Control endpoint error type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown queue: {0}")]
    UnknownQueue(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("server error: {0}")]
    Server(String),
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = match &self {
            RpcError::InvalidRequest(_) | RpcError::UnknownQueue(_) => StatusCode::BAD_REQUEST,
            RpcError::Store(_) | RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
