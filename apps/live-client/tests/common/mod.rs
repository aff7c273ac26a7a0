#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use reqwest::StatusCode;
use tokio::sync::watch;

use dashboard_common::{PresenceMap, PresenceRecord, UserRecord};
use live_client::api::{HeartbeatReply, LivenessApi};
use live_client::error::ClientError;

/// Canned answers consumed in order; the last one repeats forever.
pub struct Script<T>(Mutex<VecDeque<T>>);

impl<T: Clone> Script<T> {
    pub fn new(answers: Vec<T>) -> Self {
        assert!(!answers.is_empty(), "script needs at least one answer");
        Self(Mutex::new(answers.into()))
    }

    fn next(&self) -> T {
        let mut queue = self.0.lock();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }

    /// Replace every remaining answer.
    pub fn set(&self, answers: Vec<T>) {
        *self.0.lock() = answers.into();
    }
}

/// Open/closed switch a mock call waits on before answering.
pub struct Gate(watch::Sender<bool>);

impl Gate {
    fn open() -> Self {
        let (tx, _rx) = watch::channel(true);
        Self(tx)
    }

    pub fn close(&self) {
        self.0.send_replace(false);
    }

    pub fn release(&self) {
        self.0.send_replace(true);
    }

    async fn pass(&self) {
        let mut rx = self.0.subscribe();
        let _ = rx.wait_for(|open| *open).await;
    }
}

/// `Err(())` in a script becomes a network failure.
pub type Answer<T> = Result<T, ()>;

/// In-memory backend that records every call the view makes.
pub struct MockApi {
    pub heartbeat_replies: Script<Answer<StatusCode>>,
    pub roster: Script<Answer<Vec<UserRecord>>>,
    pub presence: Script<Answer<PresenceMap>>,
    pub heartbeat_gate: Gate,
    pub presence_gate: Gate,
    timezones: Mutex<Vec<String>>,
    heartbeat_calls: AtomicUsize,
    roster_calls: AtomicUsize,
    presence_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockApi {
    pub fn new(roster: Vec<UserRecord>, presence: PresenceMap) -> Self {
        Self {
            heartbeat_replies: Script::new(vec![Ok(StatusCode::OK)]),
            roster: Script::new(vec![Ok(roster)]),
            presence: Script::new(vec![Ok(presence)]),
            heartbeat_gate: Gate::open(),
            presence_gate: Gate::open(),
            timezones: Mutex::new(Vec::new()),
            heartbeat_calls: AtomicUsize::new(0),
            roster_calls: AtomicUsize::new(0),
            presence_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn heartbeat_calls(&self) -> usize {
        self.heartbeat_calls.load(Ordering::SeqCst)
    }

    pub fn roster_calls(&self) -> usize {
        self.roster_calls.load(Ordering::SeqCst)
    }

    pub fn presence_calls(&self) -> usize {
        self.presence_calls.load(Ordering::SeqCst)
    }

    /// Heartbeats in flight right now.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Most heartbeats ever in flight at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn timezones(&self) -> Vec<String> {
        self.timezones.lock().clone()
    }
}

#[async_trait]
impl LivenessApi for MockApi {
    async fn send_heartbeat(&self, timezone: &str) -> Result<HeartbeatReply, ClientError> {
        self.heartbeat_calls.fetch_add(1, Ordering::SeqCst);
        self.timezones.lock().push(timezone.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        self.heartbeat_gate.pass().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.heartbeat_replies.next() {
            Ok(status) => Ok(HeartbeatReply { status }),
            Err(()) => Err(ClientError::network("heartbeat", "mock outage")),
        }
    }

    async fn fetch_roster(&self) -> Result<Vec<UserRecord>, ClientError> {
        self.roster_calls.fetch_add(1, Ordering::SeqCst);
        self.roster
            .next()
            .map_err(|()| ClientError::network("roster", "mock outage"))
    }

    async fn fetch_presence(&self) -> Result<PresenceMap, ClientError> {
        self.presence_calls.fetch_add(1, Ordering::SeqCst);
        self.presence_gate.pass().await;
        self.presence
            .next()
            .map_err(|()| ClientError::network("presence", "mock outage"))
    }
}

pub fn user(id: &str) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        nickname: format!("user-{id}"),
        avatar_url: format!("https://cdn.example/{id}.png"),
    }
}

pub fn roster(ids: &[&str]) -> Vec<UserRecord> {
    ids.iter().map(|id| user(id)).collect()
}

/// Presence map from `(user_id, online, last_request_secs)` triples.
pub fn presence(entries: &[(&str, bool, i64)]) -> PresenceMap {
    entries
        .iter()
        .map(|(id, online, secs)| {
            (
                id.to_string(),
                PresenceRecord {
                    user_id: id.to_string(),
                    online: *online,
                    last_seen: format!("{secs}s"),
                    last_request_timestamp: Some(Utc.timestamp_opt(*secs, 0).unwrap()),
                },
            )
        })
        .collect()
}

/// Let spawned tasks run until they are all parked. Meant for paused-clock tests.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
