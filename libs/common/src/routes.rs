//! Route surface shared by the gate and the dashboard client.

/// Public landing page. Sessions that fail validation end up here.
pub const PUBLIC_ENTRY: &str = "/";

/// Root of the gated dashboard. Members-only sub-pages do their own checks,
/// so non-members are sent here rather than to the login page.
pub const DASHBOARD_ROOT: &str = "/dashboard";

/// Root of the per-user profile pages.
pub const PROFILE_ROOT: &str = "/profile";

/// Backend endpoints consumed by the gate and the client.
pub mod backend {
    pub const CHECK_SESSION: &str = "/discord/checkToken";
    pub const VALIDATE_MEMBER: &str = "/discord/validateMember";
    pub const HEARTBEAT: &str = "/users/heartbeat";
    pub const USER_LIST: &str = "/users/getUserList";
    pub const ONLINE_DATA: &str = "/users/getAllOnlineData";
}

/// Name of the session cookie issued by the backend.
pub const SESSION_COOKIE: &str = "sessionid";

/// Whether `path` is `prefix` itself or lives below it.
///
/// Matching is per path segment: `/dashboard/photos` is under `/dashboard`,
/// `/dashboards` is not.
pub fn is_under(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path.starts_with('/');
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Link to a user's profile page.
pub fn profile_path(user_id: &str) -> String {
    format!("{PROFILE_ROOT}/{user_id}")
}
