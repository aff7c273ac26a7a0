use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;

use web_gate::auth::collaborators::{MembershipLookup, SessionCredential, SessionValidator};
use web_gate::config::Config;
use web_gate::error::CollaboratorError;
use web_gate::AppState;

/// How a mock collaborator answers.
#[derive(Debug, Clone, Copy)]
pub enum Answer {
    Yes,
    No,
    Fail,
}

impl Answer {
    fn resolve(self, collaborator: &'static str) -> Result<bool, CollaboratorError> {
        match self {
            Answer::Yes => Ok(true),
            Answer::No => Ok(false),
            Answer::Fail => Err(CollaboratorError::unavailable(collaborator, "mock outage")),
        }
    }
}

/// In-memory session and membership collaborators that count their calls.
pub struct MockCollaborators {
    session: Answer,
    member: Answer,
    session_calls: AtomicUsize,
    member_calls: AtomicUsize,
}

impl MockCollaborators {
    pub fn new(session: Answer, member: Answer) -> Self {
        Self {
            session,
            member,
            session_calls: AtomicUsize::new(0),
            member_calls: AtomicUsize::new(0),
        }
    }

    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn member_calls(&self) -> usize {
        self.member_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionValidator for MockCollaborators {
    async fn is_valid(&self, _credential: Option<&SessionCredential>) -> Result<bool, CollaboratorError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        self.session.resolve("session")
    }
}

#[async_trait]
impl MembershipLookup for MockCollaborators {
    async fn is_member(&self, _credential: Option<&SessionCredential>) -> Result<bool, CollaboratorError> {
        self.member_calls.fetch_add(1, Ordering::SeqCst);
        self.member.resolve("membership")
    }
}

/// Build the gated app over mock collaborators.
pub fn test_app(session: Answer, member: Answer) -> (TestServer, Arc<MockCollaborators>) {
    test_app_with(Config::with_backend("http://backend.test"), session, member)
}

pub fn test_app_with(
    config: Config,
    session: Answer,
    member: Answer,
) -> (TestServer, Arc<MockCollaborators>) {
    let mocks = Arc::new(MockCollaborators::new(session, member));
    let state = AppState {
        config: Arc::new(config),
        sessions: mocks.clone(),
        membership: mocks.clone(),
    };
    let server = TestServer::new(web_gate::app(state)).unwrap();
    (server, mocks)
}

pub const SESSION_COOKIE: &str = "sessionid=test-session";
