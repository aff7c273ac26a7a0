//! Per-request session gate.
//!
//! Runs ahead of every gated page. Session validity is always checked first;
//! membership is only looked up for gated paths outside the dashboard root,
//! which keeps the non-member redirect from looping back into the gate.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use dashboard_common::routes::{self, DASHBOARD_ROOT, PUBLIC_ENTRY};

use crate::AppState;

use super::collaborators::{MembershipLookup, SessionCredential, SessionValidator};

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No session, an expired one, or a collaborator that could not answer.
    AuthInvalid,
    /// Valid session whose identity is not a member of the gated group.
    MembershipDenied,
}

impl Denial {
    /// Route the caller is sent to.
    pub fn location(self) -> &'static str {
        match self {
            Denial::AuthInvalid => PUBLIC_ENTRY,
            Denial::MembershipDenied => DASHBOARD_ROOT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny(Denial),
}

/// Decide whether the request for `path` may proceed.
///
/// Fail-closed: an error from either collaborator is an invalid session.
pub async fn evaluate(
    path: &str,
    credential: Option<&SessionCredential>,
    sessions: &dyn SessionValidator,
    membership: &dyn MembershipLookup,
) -> GateDecision {
    match sessions.is_valid(credential).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!(%path, "session invalid, redirecting to entry");
            return GateDecision::Deny(Denial::AuthInvalid);
        }
        Err(err) => {
            tracing::warn!(%path, %err, "session check failed, denying");
            return GateDecision::Deny(Denial::AuthInvalid);
        }
    }

    if routes::is_under(path, DASHBOARD_ROOT) {
        return GateDecision::Allow;
    }

    match membership.is_member(credential).await {
        Ok(true) => GateDecision::Allow,
        Ok(false) => {
            tracing::info!(%path, "not a member, redirecting to dashboard root");
            GateDecision::Deny(Denial::MembershipDenied)
        }
        Err(err) => {
            tracing::warn!(%path, %err, "membership lookup failed, denying");
            GateDecision::Deny(Denial::AuthInvalid)
        }
    }
}

/// Axum middleware wrapping [`evaluate`]. Paths outside the configured gated
/// prefixes pass through untouched.
pub async fn session_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if !state.config.is_gated(&path) {
        return next.run(request).await;
    }

    let credential = SessionCredential::from_headers(request.headers());
    let decision = evaluate(
        &path,
        credential.as_ref(),
        state.sessions.as_ref(),
        state.membership.as_ref(),
    )
    .await;

    match decision {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Deny(denial) => Redirect::temporary(denial.location()).into_response(),
    }
}
