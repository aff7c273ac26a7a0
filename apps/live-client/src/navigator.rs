//! Client-side navigation requests raised by the view's background tasks.

use tokio::sync::mpsc;

/// Moves the client to another route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Forwards navigation requests to whoever drives the view.
#[derive(Clone)]
pub struct ChannelNavigator {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: &str) {
        // Err means the driver is gone; nobody is left to navigate.
        if self.sender.send(route.to_string()).is_err() {
            tracing::debug!(%route, "navigation dropped, no receiver");
        }
    }
}
