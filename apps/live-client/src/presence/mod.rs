//! Who is online: the recurring presence poll and its rendering.

pub mod poller;
pub mod render;

use chrono::{DateTime, Utc};

pub use poller::PresencePoller;
pub use render::{render, PresenceRow, StatusLabel};

/// What the poller hands to the view after every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceSnapshot {
    /// True until both the roster and a first presence map have arrived.
    pub loading: bool,
    /// Rendered, sorted rows. Empty while loading.
    pub rows: Vec<PresenceRow>,
    /// When the presence map behind `rows` was fetched.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl PresenceSnapshot {
    pub fn loading() -> Self {
        Self {
            loading: true,
            rows: Vec::new(),
            refreshed_at: None,
        }
    }
}

impl Default for PresenceSnapshot {
    fn default() -> Self {
        Self::loading()
    }
}
