//! Session-validation and membership-lookup collaborators.

use async_trait::async_trait;
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use dashboard_common::routes::{backend, SESSION_COOKIE};

use crate::config::Config;
use crate::error::CollaboratorError;

/// The caller's session credential: the request's `Cookie` header, forwarded
/// verbatim to the collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    /// Extract the credential from request headers. Returns `None` when the
    /// request carries no non-empty session cookie.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = headers.get(COOKIE)?.to_str().ok()?;
        let has_session = raw.split(';').any(|pair| {
            pair.trim()
                .split_once('=')
                .is_some_and(|(name, value)| name == SESSION_COOKIE && !value.is_empty())
        });
        has_session.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Answers whether a session is still valid. Must be stateless per call.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn is_valid(&self, credential: Option<&SessionCredential>) -> Result<bool, CollaboratorError>;
}

/// Answers whether the session's identity belongs to the gated group.
#[async_trait]
pub trait MembershipLookup: Send + Sync {
    async fn is_member(&self, credential: Option<&SessionCredential>) -> Result<bool, CollaboratorError>;
}

#[derive(Debug, Deserialize)]
struct SessionCheck {
    valid: bool,
}

#[derive(Debug, Deserialize)]
struct MemberCheck {
    member: bool,
}

// ---------------------------------------------------------------------------
// Backend-backed implementation
// ---------------------------------------------------------------------------

/// Both collaborators, backed by the dashboard backend over HTTP.
#[derive(Clone)]
pub struct HttpCollaborators {
    backend_url: String,
    http: reqwest::Client,
}

impl HttpCollaborators {
    pub fn new(config: &Config) -> Result<Self, CollaboratorError> {
        let http = reqwest::Client::builder()
            .timeout(config.collaborator_timeout)
            .build()
            .map_err(|e| {
                tracing::error!(?e, "failed to build collaborator HTTP client");
                CollaboratorError::unavailable("http", "HTTP client unavailable")
            })?;
        Ok(Self {
            backend_url: config.backend_url.clone(),
            http,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        collaborator: &'static str,
        path: &str,
        credential: &SessionCredential,
    ) -> Result<T, CollaboratorError> {
        let url = format!("{}{}", self.backend_url, path);

        let resp = self
            .http
            .get(&url)
            .header(COOKIE, credential.as_str())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(?e, %url, collaborator, "collaborator request failed");
                CollaboratorError::unavailable(collaborator, "request failed")
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, collaborator, "collaborator answered non-success");
            return Err(CollaboratorError::bad_status(collaborator, status));
        }

        resp.json().await.map_err(|e| {
            tracing::error!(?e, %url, collaborator, "collaborator response parse failed");
            CollaboratorError::malformed(collaborator, "unexpected response body")
        })
    }
}

#[async_trait]
impl SessionValidator for HttpCollaborators {
    async fn is_valid(&self, credential: Option<&SessionCredential>) -> Result<bool, CollaboratorError> {
        let Some(credential) = credential else {
            return Ok(false);
        };
        let check: SessionCheck = self
            .fetch("session", backend::CHECK_SESSION, credential)
            .await?;
        Ok(check.valid)
    }
}

#[async_trait]
impl MembershipLookup for HttpCollaborators {
    async fn is_member(&self, credential: Option<&SessionCredential>) -> Result<bool, CollaboratorError> {
        let Some(credential) = credential else {
            return Ok(false);
        };
        let check: MemberCheck = self
            .fetch("membership", backend::VALIDATE_MEMBER, credential)
            .await?;
        Ok(check.member)
    }
}
