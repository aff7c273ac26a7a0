//! Backend endpoints the mounted dashboard view talks to.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use dashboard_common::routes::{backend, SESSION_COOKIE};
use dashboard_common::{PresenceMap, PresencePayload, RosterPayload, UserRecord};

use crate::config::Config;
use crate::error::ClientError;

/// What the heartbeat endpoint answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatReply {
    pub status: StatusCode,
}

/// Whether a heartbeat reply carries the "session gone" marker.
///
/// The backend signals a revoked session by answering the heartbeat with a
/// 302. Every other status, success or not, leaves the session alone.
pub fn is_session_revoked(reply: &HeartbeatReply) -> bool {
    reply.status == StatusCode::FOUND
}

/// Heartbeat, roster and presence endpoints, carrying the caller's session.
#[async_trait]
pub trait LivenessApi: Send + Sync {
    /// Report liveness with the caller's local timezone.
    async fn send_heartbeat(&self, timezone: &str) -> Result<HeartbeatReply, ClientError>;

    /// Every known user. Ordering carries no meaning.
    async fn fetch_roster(&self) -> Result<Vec<UserRecord>, ClientError>;

    /// Current presence of every known user, keyed by user id.
    async fn fetch_presence(&self) -> Result<PresenceMap, ClientError>;
}

#[derive(Debug, Serialize)]
struct HeartbeatRequest<'a> {
    timezone: &'a str,
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// [`LivenessApi`] over the dashboard backend's HTTP endpoints.
#[derive(Clone)]
pub struct HttpLivenessApi {
    backend_url: String,
    http: reqwest::Client,
}

impl HttpLivenessApi {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let cookie = HeaderValue::from_str(&format!("{SESSION_COOKIE}={}", config.session_id))
            .map_err(|_| ClientError::config("session id is not a valid cookie value"))?;
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie);

        // Redirects stay unfollowed so the heartbeat's 302 marker reaches us.
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(Policy::none())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                tracing::error!(?e, "failed to build backend HTTP client");
                ClientError::config("HTTP client unavailable")
            })?;

        Ok(Self {
            backend_url: config.backend_url.clone(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.backend_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        let resp = self.http.get(&url).send().await.map_err(|e| {
            tracing::warn!(?e, %url, endpoint, "backend request failed");
            ClientError::network(endpoint, e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::bad_status(endpoint, status));
        }

        resp.json().await.map_err(|e| {
            tracing::warn!(?e, %url, endpoint, "backend response parse failed");
            ClientError::malformed(endpoint, e.to_string())
        })
    }
}

#[async_trait]
impl LivenessApi for HttpLivenessApi {
    async fn send_heartbeat(&self, timezone: &str) -> Result<HeartbeatReply, ClientError> {
        let url = self.url(backend::HEARTBEAT);
        let resp = self
            .http
            .post(&url)
            .json(&HeartbeatRequest { timezone })
            .send()
            .await
            .map_err(|e| ClientError::network("heartbeat", e.to_string()))?;

        Ok(HeartbeatReply {
            status: resp.status(),
        })
    }

    async fn fetch_roster(&self) -> Result<Vec<UserRecord>, ClientError> {
        let payload: RosterPayload = self.get_json("roster", backend::USER_LIST).await?;
        Ok(payload.into_users())
    }

    async fn fetch_presence(&self) -> Result<PresenceMap, ClientError> {
        let payload: PresencePayload = self.get_json("presence", backend::ONLINE_DATA).await?;
        Ok(payload.into_map())
    }
}
