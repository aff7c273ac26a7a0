//! Roster and presence records as served by the backend.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identity and display data for one roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Backend user id. The backend names this field `discord_id`.
    #[serde(alias = "discord_id")]
    pub id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// Online / last-seen state for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    /// Filled from the map key when the payload omits it.
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub online: bool,
    /// Human-readable "last seen" string, already formatted by the backend.
    #[serde(default)]
    pub last_seen: String,
    /// Last time the backend saw any request carrying this user's session.
    /// Null for users that have never been seen, or whose stored value does
    /// not parse.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_request_timestamp: Option<DateTime<Utc>>,
}

/// RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS[.f]` taken as UTC. Anything
/// else becomes `None` so one bad record cannot fail the whole map.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::String(text)) = raw else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&text) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    Ok(NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc()))
}

/// Presence keyed by user id. Each poll replaces the whole map.
pub type PresenceMap = HashMap<String, PresenceRecord>;

/// Body of the presence endpoint: `{ "<user_id>": PresenceRecord, ... }`.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct PresencePayload(HashMap<String, PresenceRecord>);

impl PresencePayload {
    pub fn into_map(self) -> PresenceMap {
        self.0
            .into_iter()
            .map(|(key, mut record)| {
                if record.user_id.is_empty() {
                    record.user_id = key.clone();
                }
                (key, record)
            })
            .collect()
    }
}

/// Body of the roster endpoint.
///
/// The backend answers with an object keyed by its internal guid; a plain
/// array is accepted too. Ordering carries no meaning in either form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RosterPayload {
    List(Vec<UserRecord>),
    Keyed(BTreeMap<String, UserRecord>),
}

impl RosterPayload {
    pub fn into_users(self) -> Vec<UserRecord> {
        match self {
            RosterPayload::List(users) => users,
            RosterPayload::Keyed(users) => users.into_values().collect(),
        }
    }
}
