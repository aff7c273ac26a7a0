//! Merge roster and presence into the ordered display list.

use std::fmt;

use chrono::{DateTime, Utc};

use dashboard_common::routes::profile_path;
use dashboard_common::{PresenceMap, PresenceRecord, UserRecord};

/// Text shown under a user's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLabel {
    Online,
    /// Offline; carries the backend's last-seen string.
    Seen(String),
    /// No presence record for this user.
    Unknown,
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLabel::Online => f.write_str("Online"),
            StatusLabel::Seen(last_seen) => write!(f, "Seen {last_seen}"),
            StatusLabel::Unknown => f.write_str("--"),
        }
    }
}

impl StatusLabel {
    pub fn for_record(record: Option<&PresenceRecord>) -> Self {
        match record {
            Some(r) if r.online => StatusLabel::Online,
            Some(r) => StatusLabel::Seen(r.last_seen.clone()),
            None => StatusLabel::Unknown,
        }
    }
}

/// One roster entry paired with its presence.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceRow {
    pub user: UserRecord,
    pub presence: Option<PresenceRecord>,
    pub status: StatusLabel,
}

impl PresenceRow {
    /// Drives the green/red indicator dot.
    pub fn is_online(&self) -> bool {
        self.presence.as_ref().is_some_and(|p| p.online)
    }

    pub fn last_active(&self) -> Option<DateTime<Utc>> {
        self.presence.as_ref().and_then(|p| p.last_request_timestamp)
    }

    pub fn profile_href(&self) -> String {
        profile_path(&self.user.id)
    }
}

/// Pair every roster user with its presence record, most recently active
/// first.
///
/// Users with no record, or a record that was never stamped, sort last. Ties
/// keep roster order. Never drops a roster entry.
pub fn render(roster: &[UserRecord], presence: &PresenceMap) -> Vec<PresenceRow> {
    let mut rows: Vec<PresenceRow> = roster
        .iter()
        .map(|user| {
            let record = presence.get(&user.id).cloned();
            PresenceRow {
                status: StatusLabel::for_record(record.as_ref()),
                user: user.clone(),
                presence: record,
            }
        })
        .collect();

    // `None < Some(_)`, so descending order leaves unstamped users at the end.
    rows.sort_by(|a, b| b.last_active().cmp(&a.last_active()));
    rows
}
