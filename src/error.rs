// SPDX-FileCopyrightText: 2026 Marsala OS
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the site API.

use crate::limiter::Decision;
use crate::validator::ValidationError;
use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Too many requests, retry in {} seconds", .0.retry_after_secs)]
    RateLimited(Decision),

    #[error("Article not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code(),
            Self::MalformedBody(_) => "MALFORMED_BODY",
            Self::RateLimited(_) => "RATE_LIMITED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

/// `X-RateLimit-*` headers describing a decision.
pub fn rate_limit_headers(decision: &Decision) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    if let Ok(reset) = HeaderValue::from_str(&decision.reset_at.to_rfc3339()) {
        headers.insert("x-ratelimit-reset", reset);
    }
    headers
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, retry_after_secs) = match &self {
            Self::Internal(detail) => {
                error!(error = %detail, "Internal error");
                ("Internal server error".to_string(), None)
            }
            Self::RateLimited(decision) => (self.to_string(), Some(decision.retry_after_secs)),
            _ => (self.to_string(), None),
        };

        let mut headers = HeaderMap::new();
        if let Self::RateLimited(decision) = &self {
            headers = rate_limit_headers(decision);
            headers.insert(header::RETRY_AFTER, HeaderValue::from(decision.retry_after_secs));
        }

        (
            status,
            headers,
            Json(ErrorResponse {
                error: message,
                code: self.code(),
                retry_after_secs,
            }),
        )
            .into_response()
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
