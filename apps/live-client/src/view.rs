//! A mounted dashboard view and the two background tasks it owns.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use dashboard_common::routes::{is_under, DASHBOARD_ROOT};

use crate::api::LivenessApi;
use crate::heartbeat::HeartbeatBeacon;
use crate::navigator::Navigator;
use crate::presence::{PresencePoller, PresenceSnapshot};

/// Settings handed to a view at mount time.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// IANA timezone identifier reported with every heartbeat.
    pub timezone: String,
    pub heartbeat_interval: Duration,
    pub presence_interval: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            heartbeat_interval: Duration::from_secs(30),
            presence_interval: Duration::from_secs(5),
        }
    }
}

/// A live dashboard view.
///
/// Owns the heartbeat beacon and the presence poller. Both stop when the view
/// is torn down, unmounted or dropped, whichever comes first.
pub struct DashboardView {
    shutdown: CancellationToken,
    guard: DropGuard,
    heartbeat: JoinHandle<()>,
    presence: JoinHandle<()>,
    snapshots: watch::Receiver<PresenceSnapshot>,
}

impl DashboardView {
    /// Start both tasks. Must be called inside a tokio runtime.
    pub fn mount(
        config: ViewConfig,
        api: Arc<dyn LivenessApi>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let (tx, snapshots) = watch::channel(PresenceSnapshot::loading());

        let heartbeat = HeartbeatBeacon::new(
            api.clone(),
            navigator,
            config.timezone.clone(),
            config.heartbeat_interval,
        )
        .spawn(shutdown.child_token());
        let presence = PresencePoller::new(api, config.presence_interval)
            .spawn(shutdown.child_token(), tx);

        tracing::info!(
            timezone = %config.timezone,
            heartbeat_secs = config.heartbeat_interval.as_secs_f64(),
            presence_secs = config.presence_interval.as_secs_f64(),
            "dashboard view mounted"
        );

        Self {
            guard: shutdown.clone().drop_guard(),
            shutdown,
            heartbeat,
            presence,
            snapshots,
        }
    }

    /// Latest presence snapshot plus change notifications.
    pub fn presence(&self) -> watch::Receiver<PresenceSnapshot> {
        self.snapshots.clone()
    }

    /// Stop both timers. Idempotent. Replies still in flight are discarded
    /// when they land.
    pub fn teardown(&self) {
        self.shutdown.cancel();
    }

    /// Tear down and wait until both tasks have exited.
    pub async fn unmount(self) {
        let DashboardView {
            shutdown,
            guard,
            heartbeat,
            presence,
            ..
        } = self;
        shutdown.cancel();
        drop(guard);

        for (task, handle) in [("heartbeat", heartbeat), ("presence", presence)] {
            if let Err(e) = handle.await {
                tracing::error!(?e, task, "view task ended abnormally");
            }
        }
        tracing::info!("dashboard view unmounted");
    }
}

/// Why [`drive`] stopped the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    /// A task asked to leave the dashboard.
    Navigated(String),
    /// The caller's shutdown future resolved.
    Shutdown,
    /// The presence poller went away on its own.
    PollerStopped,
}

/// Run a mounted view as its owner until it has to go, then unmount it.
///
/// Presence snapshots are logged as they arrive. A navigation request to a
/// route under the dashboard root keeps the view mounted; anything else
/// leaves the dashboard.
pub async fn drive<F>(
    view: DashboardView,
    mut navigation: mpsc::UnboundedReceiver<String>,
    shutdown: F,
) -> Exit
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut presence = view.presence();

    let exit = loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break Exit::Shutdown,
            Some(route) = navigation.recv() => {
                if is_under(&route, DASHBOARD_ROOT) {
                    tracing::debug!(%route, "navigation stays on dashboard");
                    continue;
                }
                tracing::warn!(%route, "navigating away from dashboard");
                break Exit::Navigated(route);
            }
            changed = presence.changed() => {
                if changed.is_err() {
                    tracing::warn!("presence poller exited");
                    break Exit::PollerStopped;
                }
                let snapshot = presence.borrow_and_update().clone();
                if snapshot.loading {
                    tracing::info!("presence loading");
                    continue;
                }
                for row in &snapshot.rows {
                    tracing::info!(
                        user = %row.user.nickname,
                        online = row.is_online(),
                        status = %row.status,
                        profile = %row.profile_href(),
                        "presence"
                    );
                }
            }
        }
    };

    view.unmount().await;
    exit
}
