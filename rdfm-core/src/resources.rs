use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rdfm_domain::FetchOutcome;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use std::any::type_name;
use std::fmt::Debug;
use tokio::sync::RwLock;
use tracing::{event, Level};

/// Client-side cache plus fetch capabilities for one backend resource collection.
///
/// Both operations only return `Err` for transport or decoding failures. A non-2xx
/// status is a regular outcome and reported through [`FetchOutcome`].
#[async_trait]
pub trait ResourceAccessor: Send + Sync + Debug {
    /// Re-downloads the collection and replaces the cached value on success.
    async fn fetch_resources(&self) -> Result<FetchOutcome>;

    async fn fetch_post(&self, url: &str, headers: HeaderMap, body: String) -> Result<FetchOutcome>;
}

#[derive(Debug)]
pub struct ResourcesGetter<T> {
    client: ClientWithMiddleware,
    resources_url: String,
    resources: RwLock<Option<T>>,
}

impl<T> ResourcesGetter<T>
where
    T: DeserializeOwned + Clone + Send + Sync + Debug,
{
    pub fn new(client: ClientWithMiddleware, resources_url: impl Into<String>) -> Self {
        ResourcesGetter {
            client,
            resources_url: resources_url.into(),
            resources: RwLock::new(None),
        }
    }

    pub fn resources_url(&self) -> &str {
        &self.resources_url
    }

    /// Snapshot of the cache. `None` until the first successful fetch.
    pub async fn resources(&self) -> Option<T> {
        self.resources.read().await.clone()
    }
}

#[async_trait]
impl<T> ResourceAccessor for ResourcesGetter<T>
where
    T: DeserializeOwned + Clone + Send + Sync + Debug,
{
    async fn fetch_resources(&self) -> Result<FetchOutcome> {
        let resp = self
            .client
            .get(&self.resources_url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .context("Failed to send request")?;

        let status = resp.status();
        let outcome = FetchOutcome::from_status_code(status.as_u16());

        if !outcome.success {
            event!(
                Level::WARN,
                "Fetching {} from {} failed with status {}. Keeping the cached value",
                type_name::<T>(),
                self.resources_url,
                status
            );
            return Ok(outcome);
        }

        let body = resp.text().await.context("Failed to get response body")?;

        let decoded: T = serde_json::from_str(&body).map_err(|e| anyhow!("Error decoding response: '{:?}'. Response body was: '{}'", e, body))?;

        *self.resources.write().await = Some(decoded);

        event!(Level::DEBUG, "Refreshed {} from {}", type_name::<T>(), self.resources_url);

        Ok(outcome)
    }

    async fn fetch_post(&self, url: &str, headers: HeaderMap, body: String) -> Result<FetchOutcome> {
        let resp = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .context("Failed to send request")?;

        Ok(FetchOutcome::from_status_code(resp.status().as_u16()))
    }
}
