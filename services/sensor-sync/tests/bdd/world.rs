//! BDD test world for the sensor sync layer

use std::sync::Arc;

use cucumber::World;
use tokio::sync::RwLock;

use sensor_sync::config::Config;
use sensor_sync::io::{HttpClient, HttpResponse};
use sensor_sync::{SyncError, ViewHandle};

/// What the scripted client does for a matching URL
#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(HttpResponse),
    Refuse,
}

/// An HTTP client answering from a script and recording every URL it was asked for
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    routes: RwLock<Vec<(String, Scripted)>>,
    pub requests: RwLock<Vec<String>>,
}

impl ScriptedHttpClient {
    /// Answer any URL containing `pattern`; later scripts take precedence
    pub async fn script(&self, pattern: &str, scripted: Scripted) {
        self.routes
            .write()
            .await
            .insert(0, (pattern.to_string(), scripted));
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn get(&self, url: &str) -> sensor_sync::Result<HttpResponse> {
        self.requests.write().await.push(url.to_string());
        let routes = self.routes.read().await;
        match routes.iter().find(|(pattern, _)| url.contains(pattern.as_str())) {
            Some((_, Scripted::Respond(response))) => Ok(response.clone()),
            Some((_, Scripted::Refuse)) | None => Err(SyncError::Transport(format!(
                "GET {} failed: connection refused",
                url
            ))),
        }
    }
}

#[derive(Debug, Default, World)]
pub struct SyncWorld {
    pub config: Config,
    pub http: Arc<ScriptedHttpClient>,
    pub view: ViewHandle,
}

impl SyncWorld {
    pub fn http_client(&self) -> Arc<dyn HttpClient> {
        Arc::clone(&self.http) as Arc<dyn HttpClient>
    }
}
