use super::rate_limit::RateLimiter;
use super::types::{
    error_message, unwrap_envelope, AddFilesRequest, Collection, CollectionFile,
    CreateCollectionRequest, FileToAdd, SearchRequest,
};
use crate::config::NeedleSettings;
use crate::error::{GatewayError, Result};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the Needle REST API.
///
/// Cheap to clone; clones share the connection pool, the rate limit window
/// and the read-only settings.
#[derive(Debug, Clone)]
pub struct NeedleClient {
    http: Client,
    base_url: Url,
    settings: Arc<NeedleSettings>,
    limiter: Arc<RateLimiter>,
}

impl NeedleClient {
    pub fn new(settings: Arc<NeedleSettings>) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            GatewayError::Config(format!("Invalid Needle base URL '{}': {}", settings.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Config(format!(
                "Needle base URL '{}' cannot carry a path",
                settings.base_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let limiter = Arc::new(RateLimiter::new(
            settings.rate_limit_calls,
            Duration::from_millis(settings.rate_limit_period_ms),
        ));

        Ok(Self {
            http,
            base_url,
            settings,
            limiter,
        })
    }

    /// Fail unless an API key is configured. Never touches the network.
    pub fn ensure_credentials(&self) -> Result<&str> {
        self.settings.api_key().ok_or_else(|| {
            GatewayError::InvalidRequest(
                "NEEDLE_API_KEY is not set; configure an API key before calling Needle tools"
                    .to_string(),
            )
        })
    }

    pub async fn list_collections(&self) -> Result<Vec<Collection>> {
        self.get(&["collections"]).await
    }

    pub async fn create_collection(&self, name: &str) -> Result<Collection> {
        self.post(&["collections"], &CreateCollectionRequest { name })
            .await
    }

    pub async fn get_collection(&self, collection_id: &str) -> Result<Value> {
        self.get(&["collections", collection_id]).await
    }

    pub async fn collection_stats(&self, collection_id: &str) -> Result<Value> {
        self.get(&["collections", collection_id, "stats"]).await
    }

    pub async fn list_files(&self, collection_id: &str) -> Result<Vec<CollectionFile>> {
        self.get(&["collections", collection_id, "files"]).await
    }

    pub async fn add_files(
        &self,
        collection_id: &str,
        files: &[FileToAdd],
    ) -> Result<Vec<CollectionFile>> {
        self.post(
            &["collections", collection_id, "files"],
            &AddFilesRequest { files },
        )
        .await
    }

    /// Semantic search. Hits are returned exactly as Needle ranks them.
    pub async fn search(&self, collection_id: &str, text: &str) -> Result<Vec<Value>> {
        self.post(
            &["collections", collection_id, "search"],
            &SearchRequest { text },
        )
        .await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Config("Needle base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "GET request");
        self.execute(self.http.get(url)).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "POST request");
        self.execute(self.http.post(url).json(body)).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let api_key = self.ensure_credentials()?;
        self.limiter.acquire().await;

        let response = request.bearer_auth(api_key).send().await.map_err(|e| {
            warn!(error = %e, "Needle request failed before a response arrived");
            GatewayError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        if !(200..300).contains(&status) {
            let message = error_message(&body);
            warn!(status = status, message = %message, "Needle API returned an error");
            return Err(GatewayError::upstream(status, message));
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            GatewayError::upstream(status, format!("invalid response body: {}", e))
        })?;

        serde_json::from_value(unwrap_envelope(value)).map_err(|e| {
            GatewayError::upstream(status, format!("unexpected response shape: {}", e))
        })
    }
}
