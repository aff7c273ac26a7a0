use std::time::Duration;

use crate::view::ViewConfig;

/// Dashboard client configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin serving the heartbeat, roster and presence endpoints.
    pub backend_url: String,
    /// Value of the session cookie issued at login.
    pub session_id: String,
    /// IANA timezone identifier reported with every heartbeat.
    pub timezone: String,
    pub heartbeat_interval: Duration,
    pub presence_interval: Duration,
    /// Upper bound on a single backend call.
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Panics with a descriptive message if a required variable is missing.
    pub fn from_env() -> Self {
        Self {
            backend_url: required_var("BACKEND_URL").trim_end_matches('/').to_string(),
            session_id: required_var("SESSION_ID"),
            timezone: std::env::var("CLIENT_TIMEZONE")
                .or_else(|_| std::env::var("TZ"))
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "UTC".to_string()),
            heartbeat_interval: Duration::from_secs(positive_var("HEARTBEAT_INTERVAL_SECS", 30)),
            presence_interval: Duration::from_secs(positive_var("PRESENCE_POLL_INTERVAL_SECS", 5)),
            request_timeout: Duration::from_millis(positive_var("REQUEST_TIMEOUT_MS", 10_000)),
        }
    }

    /// Timer and identity settings handed to a mounted view.
    pub fn view_config(&self) -> ViewConfig {
        ViewConfig {
            timezone: self.timezone.clone(),
            heartbeat_interval: self.heartbeat_interval,
            presence_interval: self.presence_interval,
        }
    }
}

fn required_var(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} env var is required"))
}

fn positive_var(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v: &u64| *v > 0)
        .unwrap_or(default)
}
