use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use live_client::api::HttpLivenessApi;
use live_client::config::Config;
use live_client::navigator::ChannelNavigator;
use live_client::{drive, DashboardView};

#[tokio::main]
async fn main() {
    // Load .env file (silently skip if missing, env vars may be set externally)
    if dotenvy::dotenv().is_err() {
        let env_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(env_path);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let api = Arc::new(HttpLivenessApi::new(&config).expect("failed to build backend client"));
    let (navigator, routes) = ChannelNavigator::new();

    tracing::info!(backend_url = %config.backend_url, "live-client configured");

    let view = DashboardView::mount(config.view_config(), api, Arc::new(navigator));
    let exit = drive(view, routes, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(%e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("shutdown signal received");
    })
    .await;

    tracing::info!(?exit, "live-client stopped");
}
