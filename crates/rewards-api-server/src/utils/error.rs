use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Unknown or expired session identifier.
    #[error("invalid session")]
    InvalidSession,

    /// Catalog source missing, unreadable, or corrupt.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidSession => {
                tracing::warn!("Rejected ping for unknown session");
                (
                    StatusCode::BAD_REQUEST,
                    // Stable machine-readable code; clients match on it.
                    ErrorResponse {
                        error: "invalid_session",
                        message: None,
                    },
                )
            }
            ApiError::CatalogUnavailable(err) => {
                tracing::error!("Catalog unavailable: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "catalog_unavailable",
                        message: Some(err.to_string()),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
