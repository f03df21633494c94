//! # Broadcast Status Vocabulary
//!
//! The fixed set of status codes a client can receive, modelled on HTTP codes.

use serde::{Deserialize, Serialize};

/// Outcome of a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Success,
    BadRequest,
    Forbidden,
    NotFound,
    RequestEntityTooLarge,
    InternalServerError,
    NotImplemented,
    ServiceUnavailable,
}

impl Status {
    /// Numeric wire code.
    pub fn code(&self) -> u16 {
        match self {
            Status::Success => 200,
            Status::BadRequest => 400,
            Status::Forbidden => 403,
            Status::NotFound => 404,
            Status::RequestEntityTooLarge => 413,
            Status::InternalServerError => 500,
            Status::NotImplemented => 501,
            Status::ServiceUnavailable => 503,
        }
    }

    /// Inverse of [`Status::code`].
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(Status::Success),
            400 => Some(Status::BadRequest),
            403 => Some(Status::Forbidden),
            404 => Some(Status::NotFound),
            413 => Some(Status::RequestEntityTooLarge),
            500 => Some(Status::InternalServerError),
            501 => Some(Status::NotImplemented),
            503 => Some(Status::ServiceUnavailable),
            _ => None,
        }
    }

    /// Upper-snake name, also used as a metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::BadRequest => "BAD_REQUEST",
            Status::Forbidden => "FORBIDDEN",
            Status::NotFound => "NOT_FOUND",
            Status::RequestEntityTooLarge => "REQUEST_ENTITY_TOO_LARGE",
            Status::InternalServerError => "INTERNAL_SERVER_ERROR",
            Status::NotImplemented => "NOT_IMPLEMENTED",
            Status::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reply sent for each received submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub status: Status,
    /// Diagnostic text; empty on success.
    pub info: String,
}

impl BroadcastResponse {
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            info: String::new(),
        }
    }

    pub fn failure(status: Status, info: impl Into<String>) -> Self {
        Self {
            status,
            info: info.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
