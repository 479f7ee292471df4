// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::models::Provider;
use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// A provider answered with a non-success status.
    #[error("{provider} API error fetching {resource}: HTTP {status}")]
    Upstream {
        provider: Provider,
        resource: String,
        status: u16,
    },

    /// A provider call failed before a usable response (connection, decode).
    #[error("{provider} request for {resource} failed: {message}")]
    UpstreamTransport {
        provider: Provider,
        resource: String,
        message: String,
    },

    #[error("Could not determine {provider} account type for {handle}")]
    UnresolvedAccount { provider: Provider, handle: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for every failure that originated at a provider.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AppError::Upstream { .. }
                | AppError::UpstreamTransport { .. }
                | AppError::UnresolvedAccount { .. }
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. }
            | AppError::UpstreamTransport { .. }
            | AppError::UnresolvedAccount { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match &self {
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::BadRequest(_) => "bad_request",
            AppError::Upstream { .. }
            | AppError::UpstreamTransport { .. }
            | AppError::UnresolvedAccount { .. } => {
                tracing::warn!(error = %self, "Upstream provider error");
                "upstream_error"
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "internal_error"
            }
        };

        // Internal details stay in the logs
        let message = match &self {
            AppError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
