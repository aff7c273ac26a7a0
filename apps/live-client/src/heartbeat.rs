//! Recurring liveness beacon for a mounted dashboard view.
//!
//! Beats once right away, then once per interval. Sends are awaited inside
//! the loop and missed ticks are skipped, so one beacon never has two sends
//! in flight and last-seen updates reach the backend in order.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use dashboard_common::routes::PUBLIC_ENTRY;

use crate::api::{is_session_revoked, LivenessApi};
use crate::navigator::Navigator;

/// Shortest period accepted by the beacon; `tokio::time::interval` rejects zero.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

pub struct HeartbeatBeacon {
    api: Arc<dyn LivenessApi>,
    navigator: Arc<dyn Navigator>,
    timezone: String,
    interval: Duration,
}

impl HeartbeatBeacon {
    pub fn new(
        api: Arc<dyn LivenessApi>,
        navigator: Arc<dyn Navigator>,
        timezone: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            navigator,
            timezone: timezone.into(),
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Beat until `shutdown` is cancelled.
    ///
    /// A "session gone" reply navigates to the public entry but does not stop
    /// the beacon; only the owner stops it. A reply that lands after
    /// cancellation is dropped without effects.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut beats: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let result = self.api.send_heartbeat(&self.timezone).await;
            if shutdown.is_cancelled() {
                tracing::debug!("heartbeat reply arrived after teardown, discarding");
                break;
            }
            beats += 1;

            match result {
                Ok(reply) if is_session_revoked(&reply) => {
                    tracing::warn!(beats, "session revoked, leaving dashboard");
                    self.navigator.navigate(PUBLIC_ENTRY);
                }
                Ok(reply) if reply.status.is_success() => {
                    tracing::trace!(beats, "heartbeat acknowledged");
                }
                Ok(reply) => {
                    tracing::warn!(beats, status = %reply.status, "heartbeat answered unexpectedly");
                }
                Err(err) => {
                    tracing::warn!(beats, %err, "heartbeat failed");
                }
            }
        }

        tracing::debug!(beats, "heartbeat beacon stopped");
    }
}
