//! Caller-owned view state that sync calls publish into
//!
//! A view component owns a [`ViewHandle`] and passes it explicitly to
//! [`ResourceFetcher::fetch`](crate::resource::ResourceFetcher::fetch) and
//! [`HealthProbe::check_health`](crate::health::HealthProbe::check_health).
//! Once the view is torn down, late responses are dropped instead of written.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Display state of a single view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Resource payloads keyed by resource name
    pub fields: BTreeMap<String, Value>,
    /// Result of the last health probe, unset until the first one resolves
    pub health: Option<bool>,
}

/// Shared handle to a view's state plus its teardown marker
#[derive(Debug, Clone, Default)]
pub struct ViewHandle {
    state: Arc<RwLock<ViewState>>,
    torn_down: CancellationToken,
}

impl ViewHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to the field `name`. Returns false if the view is gone.
    pub async fn publish(&self, name: &str, value: Value) -> bool {
        let mut state = self.state.write().await;
        if self.torn_down.is_cancelled() {
            tracing::debug!("Dropping '{}' update for torn-down view", name);
            return false;
        }
        state.fields.insert(name.to_string(), value);
        true
    }

    /// Assign the `health` field. Returns false if the view is gone.
    pub async fn publish_health(&self, healthy: bool) -> bool {
        let mut state = self.state.write().await;
        if self.torn_down.is_cancelled() {
            tracing::debug!("Dropping health update for torn-down view");
            return false;
        }
        state.health = Some(healthy);
        true
    }

    pub async fn field(&self, name: &str) -> Option<Value> {
        self.state.read().await.fields.get(name).cloned()
    }

    pub async fn health(&self) -> Option<bool> {
        self.state.read().await.health
    }

    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    /// Mark the view as gone. Takes the write lock so an in-progress publish
    /// finishes first and every later one is dropped.
    pub async fn teardown(&self) {
        let _state = self.state.write().await;
        self.torn_down.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.is_cancelled()
    }

    /// Resolves once [`teardown`](Self::teardown) has been called
    pub async fn torn_down(&self) {
        self.torn_down.cancelled().await;
    }
}
