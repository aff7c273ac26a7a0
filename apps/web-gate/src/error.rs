use std::fmt;

use axum::http::StatusCode;

/// A session or membership collaborator call that produced no usable answer.
///
/// The gate never lets one of these through: any collaborator failure is
/// handled as an invalid session.
#[derive(Debug)]
pub struct CollaboratorError {
    /// Which collaborator failed (e.g. `"session"`, `"membership"`).
    pub collaborator: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl CollaboratorError {
    pub fn unavailable(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            code: "UNAVAILABLE",
            message: message.into(),
        }
    }

    pub fn bad_status(collaborator: &'static str, status: StatusCode) -> Self {
        Self {
            collaborator,
            code: "BAD_STATUS",
            message: format!("collaborator answered {status}"),
        }
    }

    pub fn malformed(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            code: "MALFORMED",
            message: message.into(),
        }
    }
}

impl fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} collaborator {}: {}", self.collaborator, self.code, self.message)
    }
}

impl std::error::Error for CollaboratorError {}
