use std::time::Duration;

use dashboard_common::routes::{self, DASHBOARD_ROOT, PROFILE_ROOT, PUBLIC_ENTRY};

/// Web gate configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin serving the session and membership endpoints
    /// (e.g. `http://localhost:8000`).
    pub backend_url: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Path prefixes the session gate runs for. Other paths are never gated,
    /// and neither is the public entry, where denied requests land.
    pub gated_prefixes: Vec<String>,
    /// Upper bound on a single collaborator call.
    pub collaborator_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Panics with a descriptive message if a required variable is missing.
    pub fn from_env() -> Self {
        let mut config = Self::with_backend(required_var("BACKEND_URL"));
        if let Some(port) = std::env::var("PORT").ok().and_then(|v| v.parse().ok()) {
            config.port = port;
        }
        if let Ok(raw) = std::env::var("GATED_PREFIXES") {
            let prefixes = parse_prefixes(&raw);
            if !prefixes.is_empty() {
                config.gated_prefixes = prefixes;
            }
        }
        if let Some(ms) = std::env::var("COLLABORATOR_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.collaborator_timeout = Duration::from_millis(ms);
        }
        config
    }

    /// Defaults for everything except the backend origin.
    pub fn with_backend(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
            port: 3000,
            gated_prefixes: vec![DASHBOARD_ROOT.to_string(), PROFILE_ROOT.to_string()],
            collaborator_timeout: Duration::from_millis(5000),
        }
    }

    /// Whether the session gate applies to `path`.
    pub fn is_gated(&self, path: &str) -> bool {
        path != PUBLIC_ENTRY
            && self
                .gated_prefixes
                .iter()
                .filter(|prefix| gateable(prefix))
                .any(|prefix| routes::is_under(path, prefix))
    }
}

fn required_var(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} env var is required"))
}

fn parse_prefixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| p.starts_with('/') && gateable(p))
        .map(str::to_string)
        .collect()
}

/// A prefix covering the public entry would redirect denied requests back
/// onto itself.
fn gateable(prefix: &str) -> bool {
    !prefix.trim_end_matches('/').is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prefixes_gate_dashboard_and_profiles() {
        let config = Config::with_backend("http://backend/");
        assert_eq!(config.backend_url, "http://backend");
        assert!(config.is_gated("/dashboard"));
        assert!(config.is_gated("/dashboard/spotify"));
        assert!(config.is_gated("/profile/42"));
        assert!(!config.is_gated("/"));
        assert!(!config.is_gated("/health"));
    }

    #[test]
    fn prefix_list_skips_blank_and_relative_entries() {
        assert_eq!(
            parse_prefixes(" /dashboard , ,admin,/profile"),
            vec!["/dashboard".to_string(), "/profile".to_string()]
        );
    }

    #[test]
    fn public_entry_is_never_a_gated_prefix() {
        assert_eq!(
            parse_prefixes("/,//,/dashboard"),
            vec!["/dashboard".to_string()]
        );

        let mut config = Config::with_backend("http://backend");
        config.gated_prefixes = vec!["/".to_string()];
        assert!(!config.is_gated("/"));
        assert!(!config.is_gated("/dashboard"));

        config.gated_prefixes.push("/dashboard".to_string());
        assert!(!config.is_gated("/"));
        assert!(config.is_gated("/dashboard/x"));
    }
}
