//! Error types for gridbook-core

use thiserror::Error;

/// Errors raised by the grid engine and the repository
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Record not found: {uid}")]
    RecordNotFound { uid: String },

    #[error("Duplicate record id: {uid}")]
    DuplicateUid { uid: String },

    #[error("No active draft for record: {uid}")]
    NotEditing { uid: String },

    #[error("Invalid payload: {message}")]
    InvalidPayload { message: String },
}

impl CoreError {
    pub fn not_found(uid: impl Into<String>) -> Self {
        CoreError::RecordNotFound { uid: uid.into() }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        CoreError::InvalidPayload {
            message: message.into(),
        }
    }
}
