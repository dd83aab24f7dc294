//! Poller: re-invokes fetches and health probes on their configured cadence

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::{Config, DeviceConfig, ResourceConfig};
use crate::health::HealthProbe;
use crate::io::HttpClient;
use crate::resource::ResourceFetcher;
use crate::view::ViewHandle;

/// A view showing one resource collection
#[derive(Debug, Clone)]
pub struct ResourceView {
    pub config: ResourceConfig,
    pub view: ViewHandle,
}

/// A view showing the health of one device
#[derive(Debug, Clone)]
pub struct DeviceView {
    pub config: DeviceConfig,
    pub view: ViewHandle,
}

/// Health of a device as last observed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceHealth {
    pub name: String,
    pub hostname: String,
    pub healthy: Option<bool>,
}

/// Everything the views currently display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub resources: BTreeMap<String, Option<Value>>,
    pub devices: Vec<DeviceHealth>,
}

/// Drives the sync layer for every configured resource and device
pub struct Poller {
    fetcher: Arc<ResourceFetcher>,
    probe: Arc<HealthProbe>,
    resources: Vec<ResourceView>,
    devices: Vec<DeviceView>,
    cancel: CancellationToken,
}

impl Poller {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>, cancel: CancellationToken) -> Self {
        let resources = config
            .resources
            .iter()
            .map(|config| ResourceView {
                config: config.clone(),
                view: ViewHandle::new(),
            })
            .collect();
        let devices = config
            .devices
            .iter()
            .map(|config| DeviceView {
                config: config.clone(),
                view: ViewHandle::new(),
            })
            .collect();

        Self {
            fetcher: Arc::new(ResourceFetcher::new(config, Arc::clone(&http))),
            probe: Arc::new(HealthProbe::new(config, http)),
            resources,
            devices,
            cancel,
        }
    }

    pub fn resource_views(&self) -> &[ResourceView] {
        &self.resources
    }

    pub fn device_views(&self) -> &[DeviceView] {
        &self.devices
    }

    /// Run one fetch per resource and one probe per device, concurrently
    pub async fn sync_once(&self) -> DashboardSnapshot {
        let mut tasks = JoinSet::new();

        for resource in &self.resources {
            let fetcher = Arc::clone(&self.fetcher);
            let resource = resource.clone();
            tasks.spawn(async move {
                let query = fetcher.query_for(&resource.config);
                fetcher
                    .fetch_page(&resource.view, &resource.config.name, query)
                    .await;
            });
        }
        for device in &self.devices {
            let probe = Arc::clone(&self.probe);
            let device = device.clone();
            tasks.spawn(async move {
                probe
                    .check_health(&device.view, &device.config.hostname)
                    .await;
            });
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::warn!("Sync task failed: {}", e);
            }
        }

        self.snapshot().await
    }

    /// Poll until cancelled, then tear down every view
    pub async fn run(&self) {
        let mut tasks = JoinSet::new();

        for resource in &self.resources {
            let fetcher = Arc::clone(&self.fetcher);
            let resource = resource.clone();
            let cancel = self.cancel.clone();
            tasks.spawn(async move {
                resource_loop(fetcher, resource, cancel).await;
            });
        }
        for device in &self.devices {
            let probe = Arc::clone(&self.probe);
            let device = device.clone();
            let cancel = self.cancel.clone();
            tasks.spawn(async move {
                device_loop(probe, device, cancel).await;
            });
        }

        self.cancel.cancelled().await;
        self.teardown_all().await;

        while tasks.join_next().await.is_some() {}
    }

    pub async fn teardown_all(&self) {
        for resource in &self.resources {
            resource.view.teardown().await;
        }
        for device in &self.devices {
            device.view.teardown().await;
        }
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let mut snapshot = DashboardSnapshot::default();
        for resource in &self.resources {
            let name = &resource.config.name;
            snapshot
                .resources
                .insert(name.clone(), resource.view.field(name).await);
        }
        for device in &self.devices {
            snapshot.devices.push(DeviceHealth {
                name: device.config.name.clone(),
                hostname: device.config.hostname.clone(),
                healthy: device.view.health().await,
            });
        }
        snapshot
    }
}

async fn resource_loop(
    fetcher: Arc<ResourceFetcher>,
    resource: ResourceView,
    cancel: CancellationToken,
) {
    let interval = Duration::from_secs(resource.config.polling_interval_seconds);
    let query = fetcher.query_for(&resource.config);
    loop {
        fetcher
            .fetch_page(&resource.view, &resource.config.name, query)
            .await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => break,
            _ = resource.view.torn_down() => break,
        }
    }
    tracing::debug!("Polling loop for '{}' stopped", resource.config.name);
}

async fn device_loop(probe: Arc<HealthProbe>, device: DeviceView, cancel: CancellationToken) {
    let interval = Duration::from_secs(device.config.polling_interval_seconds);
    loop {
        probe
            .check_health(&device.view, &device.config.hostname)
            .await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => break,
            _ = device.view.torn_down() => break,
        }
    }
    tracing::debug!("Health loop for '{}' stopped", device.config.name);
}
