//! Sensor Sync - data synchronization layer for the home sensor dashboard
//!
//! Fetches bounded resource collections from the dashboard API and probes
//! device health endpoints, publishing results into caller-owned views.

pub mod config;
pub mod error;
pub mod health;
pub mod io;
pub mod poller;
pub mod resource;
pub mod view;

pub use config::{load_config, Config, HealthPolicy};
pub use error::{Result, SyncError};
pub use health::HealthProbe;
pub use poller::{DashboardSnapshot, Poller};
pub use resource::{ResourceFetcher, ResourceQuery};
pub use view::{ViewHandle, ViewState};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;

fn build_poller(config: &Config, cancel: CancellationToken) -> Result<Poller> {
    config.validate()?;
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new(config.request_timeout())?);
    Ok(Poller::new(config, http, cancel))
}

/// Run a single sync round and return what the views would display
pub async fn sync_once(config: &Config) -> Result<DashboardSnapshot> {
    let poller = build_poller(config, CancellationToken::new())?;
    tracing::debug!(
        "Syncing {} resources and {} devices once",
        config.resources.len(),
        config.devices.len()
    );
    Ok(poller.sync_once().await)
}

/// Poll every configured resource and device until `cancel` fires
pub async fn run(config: &Config, cancel: CancellationToken) -> Result<DashboardSnapshot> {
    let poller = build_poller(config, cancel)?;

    tracing::info!(
        "Polling {} resources from {} and {} devices",
        config.resources.len(),
        config.api_base_url,
        config.devices.len()
    );
    poller.run().await;
    tracing::info!("Polling stopped");

    Ok(poller.snapshot().await)
}
