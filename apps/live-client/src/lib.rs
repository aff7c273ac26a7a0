pub mod api;
pub mod config;
pub mod error;
pub mod heartbeat;
pub mod navigator;
pub mod presence;
pub mod view;

pub use view::{drive, DashboardView, Exit, ViewConfig};
