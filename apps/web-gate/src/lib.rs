pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{middleware, Router};

use auth::collaborators::{MembershipLookup, SessionValidator};
use config::Config;

/// Shared application state available to the gate and all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<dyn SessionValidator>,
    pub membership: Arc<dyn MembershipLookup>,
}

/// All routes with the session gate in front of them.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::gate::session_gate,
        ))
        .with_state(state)
}
