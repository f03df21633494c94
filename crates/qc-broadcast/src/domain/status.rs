//! Error → status mapping
//!
//! The status depends on *where* the error surfaced, not only on what it says:
//!
//! | Stage | Error | Status |
//! |-------|-------|--------|
//! | Resolve, Validate | `ChannelDoesNotExist` | NOT_FOUND |
//! | Resolve, Validate | anything else | BAD_REQUEST |
//! | Submit | anything | SERVICE_UNAVAILABLE |
//!
//! Validation failures are the client's to fix and are not worth retrying as-is.
//! Submission failures mean the backend is overloaded or shutting down and the
//! client should back off and retry.

use shared_types::{BroadcastResponse, Status};

use super::errors::BroadcastError;

/// Step of the per-message pipeline an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Channel lookup and classification
    Resolve,
    /// `process_normal_msg` / `process_config_update_msg`
    Validate,
    /// `order` / `configure`
    Submit,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Resolve => "resolve",
            Stage::Validate => "validate",
            Stage::Submit => "submit",
        }
    }
}

/// Status reported for `err` raised at `stage`.
pub fn status_for(stage: Stage, err: &BroadcastError) -> Status {
    match stage {
        Stage::Resolve | Stage::Validate => match err {
            BroadcastError::ChannelDoesNotExist(_) => Status::NotFound,
            BroadcastError::ValidationFailed(_) | BroadcastError::SubmissionRejected(_) => {
                Status::BadRequest
            }
        },
        Stage::Submit => Status::ServiceUnavailable,
    }
}

/// Builds the failure response for `err` raised at `stage`.
pub fn failure_response(stage: Stage, err: &BroadcastError) -> BroadcastResponse {
    BroadcastResponse::failure(status_for(stage, err), err.to_string())
}
