//! Device liveness probe against `http://<hostname>/health`

use std::sync::Arc;

use serde_json::Value;

use crate::config::{Config, HealthPolicy};
use crate::io::HttpClient;
use crate::view::ViewHandle;

/// Body a healthy device answers with
pub const SUCCESS_TOKEN: &str = "Ok";

/// Probes device health endpoints and publishes the result into a view
pub struct HealthProbe {
    policy: HealthPolicy,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for HealthProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthProbe")
            .field("policy", &self.policy)
            .finish()
    }
}

impl HealthProbe {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created HealthProbe with {:?} policy", config.health_policy);
        Self {
            policy: config.health_policy,
            http,
        }
    }

    pub fn health_url(hostname: &str) -> String {
        format!("http://{}/health", hostname)
    }

    /// Probe `hostname` and publish the result into `target`'s `health` field.
    ///
    /// Every failure is logged and published as `false`.
    pub async fn check_health(&self, target: &ViewHandle, hostname: &str) {
        let healthy = match self.probe(hostname).await {
            Ok(healthy) => {
                if !healthy {
                    tracing::debug!("{} reported unhealthy", hostname);
                }
                healthy
            }
            Err(e) => {
                tracing::warn!("Health check for {} failed: {}", hostname, e);
                false
            }
        };

        if !target.publish_health(healthy).await {
            tracing::debug!("View gone before health of {} resolved", hostname);
        }
    }

    /// Issue the request and evaluate the body without touching any view
    pub async fn probe(&self, hostname: &str) -> crate::Result<bool> {
        let url = Self::health_url(hostname);
        tracing::debug!("Probing {}", url);

        let response = self.http.get(&url).await?;
        if !response.is_success() {
            return Err(crate::SyncError::Status {
                url,
                status: response.status,
            });
        }

        Ok(is_healthy(self.policy, &response.body))
    }
}

/// Whether `body` is a healthy answer under `policy`.
///
/// The token may arrive as plain text or as a JSON string.
pub fn is_healthy(policy: HealthPolicy, body: &str) -> bool {
    if body.trim() == SUCCESS_TOKEN {
        return true;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s == SUCCESS_TOKEN,
        Ok(Value::Object(map)) if policy == HealthPolicy::Permissive => {
            map.get("status").and_then(Value::as_str) == Some(SUCCESS_TOKEN)
        }
        _ => false,
    }
}
