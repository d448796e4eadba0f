//! HTTP error handling and response conversion.
//!
//! This module is the single place where error kinds are translated into an
//! HTTP status and the structured JSON error body:
//!
//! ```json
//! {"timestamp": "...", "status": 404, "error": "Not Found",
//!  "message": "Employee not found with id: 7", "validationErrors": null}
//! ```

use crate::domain::employee::errors::DomainError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};
use ts_rs::TS;
use validator::ValidationErrors;

/// Wire shape of every error response.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub validation_errors: Option<BTreeMap<String, String>>,
}

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Referenced employee does not exist (404).
    NotFound(String),

    /// Email uniqueness violated (409).
    Conflict(String),

    /// Field-level validation failures, keyed by wire field name (400).
    Validation(BTreeMap<String, String>),

    /// Extractor rejection for the body, query string or path. Keeps the
    /// rejection's status (400, 413, 415).
    Rejected(StatusCode, String),

    /// Unclassified internal error (500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::Validation(fields) => write!(f, "Validation failed: {:?}", fields),
            Self::Rejected(status, msg) => write!(f, "Rejected ({}): {}", status, msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(status, _) => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_label(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Not Found",
            Self::Conflict(_) => "Conflict",
            Self::Validation(_) => "Validation Failed",
            Self::Rejected(status, _) => status.canonical_reason().unwrap_or("Bad Request"),
            Self::Internal(_) => "Internal Server Error",
        }
    }

    pub fn to_body(&self) -> ErrorResponse {
        let (message, validation_errors) = match self {
            Self::Validation(fields) => ("Invalid input data".to_string(), Some(fields.clone())),
            Self::NotFound(msg) | Self::Conflict(msg) | Self::Rejected(_, msg) | Self::Internal(msg) => {
                (msg.clone(), None)
            }
        };

        ErrorResponse {
            timestamp: Utc::now(),
            status: self.status_code().as_u16(),
            error: self.error_label().to_string(),
            message,
            validation_errors,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("error={}", self);
        } else {
            tracing::warn!("error={}", self);
        }

        (status, Json(self.to_body())).into_response()
    }
}

// === Domain Error Conversion ===

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(_) => AppError::NotFound(err.to_string()),
            DomainError::EmailAlreadyExists(_) => AppError::Conflict(err.to_string()),
            DomainError::InfrastructureError(msg) => AppError::Internal(msg),
        }
    }
}

// === Validation Error Conversion ===

/// `first_name` -> `firstName`, matching the JSON field names.
fn wire_field_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                let first = errs.first()?;
                let reason = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", first.code));
                Some((wire_field_name(&field), reason))
            })
            .collect();
        AppError::Validation(fields)
    }
}

// === Extractor Rejection Conversion ===

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // Well-formed JSON of the wrong shape is reported like a syntax error.
        let status = match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
            other => other,
        };
        AppError::Rejected(status, rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Rejected(rejection.status(), rejection.body_text())
    }
}
