//! Recurring presence poll for a mounted dashboard view.
//!
//! The poll task owns the roster and the latest presence map outright and
//! publishes an immutable [`PresenceSnapshot`] after every tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use dashboard_common::{PresenceMap, UserRecord};

use crate::api::LivenessApi;
use crate::error::ClientError;

use super::render::render;
use super::PresenceSnapshot;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// State held by one poll task for the lifetime of its view.
#[derive(Default)]
struct Held {
    roster: Option<Vec<UserRecord>>,
    presence: Option<PresenceMap>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Held {
    fn apply_roster(&mut self, result: Result<Vec<UserRecord>, ClientError>) {
        match result {
            Ok(users) => {
                tracing::debug!(users = users.len(), "roster loaded");
                self.roster = Some(users);
            }
            Err(err) => tracing::warn!(%err, "roster fetch failed"),
        }
    }

    /// Replaces the map wholesale; a failed fetch keeps the previous one.
    fn apply_presence(&mut self, result: Result<PresenceMap, ClientError>) {
        match result {
            Ok(map) => {
                self.presence = Some(map);
                self.refreshed_at = Some(Utc::now());
            }
            Err(err) => tracing::warn!(%err, "presence fetch failed, keeping previous"),
        }
    }

    fn snapshot(&self) -> PresenceSnapshot {
        match (&self.roster, &self.presence) {
            (Some(roster), Some(presence)) => PresenceSnapshot {
                loading: false,
                rows: render(roster, presence),
                refreshed_at: self.refreshed_at,
            },
            _ => PresenceSnapshot::loading(),
        }
    }
}

pub struct PresencePoller {
    api: Arc<dyn LivenessApi>,
    interval: Duration,
}

impl PresencePoller {
    pub fn new(api: Arc<dyn LivenessApi>, interval: Duration) -> Self {
        Self {
            api,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub fn spawn(
        self,
        shutdown: CancellationToken,
        snapshots: watch::Sender<PresenceSnapshot>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown, snapshots))
    }

    /// Poll until `shutdown` is cancelled.
    ///
    /// Fetches the roster and the first presence map concurrently, then only
    /// the presence map every interval. The roster is fetched again only while
    /// it has never arrived. A fetch still in flight at cancellation completes,
    /// but nothing is published from it.
    pub async fn run(self, shutdown: CancellationToken, snapshots: watch::Sender<PresenceSnapshot>) {
        let mut held = Held::default();

        let (roster, presence) = tokio::join!(self.api.fetch_roster(), self.api.fetch_presence());
        if shutdown.is_cancelled() {
            tracing::debug!("presence poller torn down during initial load");
            return;
        }
        held.apply_roster(roster);
        held.apply_presence(presence);
        snapshots.send_replace(held.snapshot());

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await; // First tick fires immediately; the initial load covered it.

        let mut polls: u64 = 0;
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let (roster, presence) = if held.roster.is_none() {
                let (roster, presence) =
                    tokio::join!(self.api.fetch_roster(), self.api.fetch_presence());
                (Some(roster), presence)
            } else {
                (None, self.api.fetch_presence().await)
            };
            if shutdown.is_cancelled() {
                tracing::debug!("presence reply arrived after teardown, discarding");
                break;
            }
            polls += 1;

            if let Some(roster) = roster {
                held.apply_roster(roster);
            }
            held.apply_presence(presence);
            snapshots.send_replace(held.snapshot());
            tracing::trace!(polls, "presence refreshed");
        }

        tracing::debug!(polls, "presence poller stopped");
    }
}
