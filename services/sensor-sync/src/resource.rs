//! Bounded REST collection fetches published into a view

use std::num::NonZeroU32;
use std::sync::Arc;

use serde_json::Value;

use crate::config::{Config, ResourceConfig};
use crate::io::HttpClient;
use crate::view::ViewHandle;

/// Paging parameters for a list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceQuery {
    pub limit: NonZeroU32,
    pub offset: u32,
}

impl ResourceQuery {
    pub fn with_limit(limit: NonZeroU32) -> Self {
        Self { limit, offset: 0 }
    }
}

/// Fetches named collections from the dashboard API
pub struct ResourceFetcher {
    base_url: String,
    default_limit: NonZeroU32,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ResourceFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceFetcher")
            .field("base_url", &self.base_url)
            .field("default_limit", &self.default_limit)
            .finish()
    }
}

impl ResourceFetcher {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>) -> Self {
        let base_url = config.api_base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created ResourceFetcher for {}", base_url);

        Self {
            base_url,
            default_limit: config.default_limit,
            http,
        }
    }

    /// Paging for a configured resource, using the default limit if it names none
    pub fn query_for(&self, resource: &ResourceConfig) -> ResourceQuery {
        ResourceQuery {
            limit: resource.limit.unwrap_or(self.default_limit),
            offset: resource.offset,
        }
    }

    /// URL for `name`; the name is used verbatim as a path segment
    pub fn resource_url(&self, name: &str, query: &ResourceQuery) -> String {
        let mut url = format!("{}/{}?limit={}", self.base_url, name, query.limit);
        if query.offset > 0 {
            url.push_str(&format!("&offset={}", query.offset));
        }
        url
    }

    /// Fetch `name` into `target`, falling back to the default limit.
    ///
    /// Failures are logged and leave the target's field as it was.
    pub async fn fetch(&self, target: &ViewHandle, name: &str, limit: Option<NonZeroU32>) {
        let query = ResourceQuery::with_limit(limit.unwrap_or(self.default_limit));
        self.fetch_page(target, name, query).await;
    }

    /// Like [`fetch`](Self::fetch) with an explicit offset
    pub async fn fetch_page(&self, target: &ViewHandle, name: &str, query: ResourceQuery) {
        match self.request(name, &query).await {
            Ok(records) => {
                if !target.publish(name, records).await {
                    tracing::debug!("View gone before '{}' resolved", name);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to fetch '{}': {}", name, e);
            }
        }
    }

    /// Issue the request and decode the body without touching any view
    pub async fn request(&self, name: &str, query: &ResourceQuery) -> crate::Result<Value> {
        let url = self.resource_url(name, query);
        tracing::debug!("Fetching '{}' from {}", name, url);

        let response = self.http.get(&url).await?;
        if !response.is_success() {
            return Err(crate::SyncError::Status {
                url,
                status: response.status,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }
}
