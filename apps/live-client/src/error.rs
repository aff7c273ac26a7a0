use std::fmt;

use reqwest::StatusCode;

/// A backend call from the dashboard client that produced no usable answer.
///
/// Always transient from the client's point of view: the failing tick is
/// skipped and the previous state stays on screen.
#[derive(Debug)]
pub struct ClientError {
    /// Endpoint that failed (e.g. `"heartbeat"`, `"roster"`).
    pub endpoint: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl ClientError {
    pub fn network(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self {
            endpoint,
            code: "NETWORK",
            message: message.into(),
        }
    }

    pub fn bad_status(endpoint: &'static str, status: StatusCode) -> Self {
        Self {
            endpoint,
            code: "BAD_STATUS",
            message: format!("backend answered {status}"),
        }
    }

    pub fn malformed(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self {
            endpoint,
            code: "MALFORMED",
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self {
            endpoint: "client",
            code: "CONFIG",
            message: message.into(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.endpoint, self.code, self.message)
    }
}

impl std::error::Error for ClientError {}
