// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Failure of a panel operation.
///
/// Every variant carries a human-readable message that is shown to the
/// operator as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// A required field was missing or invalid. Raised before any network call.
    Validation(String),
    /// The token endpoint was unreachable or rejected the refresh token.
    Auth(String),
    /// The MPSK resource API returned a non-success response or was unreachable.
    Upstream { status: Option<u16>, message: String },
}

impl PanelError {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream { status, message: message.into() }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Auth(_) => 502,
            Self::Upstream { .. } => 502,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Auth(_) => "AUTH_FAILURE",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
        }
    }

    /// The operator-facing message without the error code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::Auth(msg) => msg,
            Self::Upstream { message, .. } => message,
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody { code: self.as_str().to_owned(), message: self.message().to_owned() }
    }

    pub fn to_http_response(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse { error: self.to_error_body() }))
    }
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation: {msg}"),
            Self::Auth(msg) => write!(f, "auth: {msg}"),
            Self::Upstream { status: Some(code), message } => {
                write!(f, "upstream ({code}): {message}")
            }
            Self::Upstream { status: None, message } => write!(f, "upstream: {message}"),
        }
    }
}

impl std::error::Error for PanelError {}

/// Top-level error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error body with machine-readable code and human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
