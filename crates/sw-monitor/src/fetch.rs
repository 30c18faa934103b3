//! Remote fetch.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use reqwest::header::{
    CACHE_CONTROL, CONNECTION, EXPIRES, IF_MODIFIED_SINCE, IF_NONE_MATCH, PRAGMA,
};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::config::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};

/// Raw response for one item. Any status other than 200 means the content
/// is treated as absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Bytes,
    /// The URL actually requested, for reporting.
    pub url: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<Bytes>, url: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            url: url.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Source of remote counterparts, keyed by item file name.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the current remote bytes. A reachable server answering with a
    /// non-success status is `Ok`; only transport failures are `Err`.
    async fn fetch(&self, name: &str) -> MonitorResult<FetchResponse>;
}

/// HTTP remote source rooted at `MonitorConfig::base_url`.
pub struct HttpRemoteSource {
    client: Client,
    base: Url,
}

impl HttpRemoteSource {
    pub fn new(config: &MonitorConfig) -> MonitorResult<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| MonitorError::Config(format!("invalid base_url: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(MonitorError::Config(format!(
                "base_url cannot carry a path: {base}"
            )));
        }
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client, base })
    }

    /// URL for an item: the percent-encoded name appended to the base path,
    /// plus a `t` query parameter that defeats intermediate caches.
    pub fn item_url(&self, name: &str, cache_buster: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(name);
        }
        url.query_pairs_mut().append_pair("t", cache_buster);
        url
    }
}

/// Fresh cache-busting token: hex nanoseconds plus a random suffix.
pub fn cache_buster() -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let salt: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{nanos:x}-{salt}")
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch(&self, name: &str) -> MonitorResult<FetchResponse> {
        let url = self.item_url(name, &cache_buster());
        debug!(item = name, %url, "fetching remote copy");

        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(PRAGMA, "no-cache")
            .header(EXPIRES, "0")
            .header(IF_MODIFIED_SINCE, "Thu, 01 Jan 1970 00:00:00 GMT")
            .header(IF_NONE_MATCH, "")
            .header(CONNECTION, "close")
            .send()
            .await?;

        let status = response.status();
        let body = if status == StatusCode::OK {
            response.bytes().await?
        } else {
            Bytes::new()
        };
        Ok(FetchResponse {
            status: status.as_u16(),
            body,
            url: url.to_string(),
        })
    }
}

/// Remote source served from memory. Unknown names answer 404.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRemote {
    items: HashMap<String, FetchResponse>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, body: impl Into<Bytes>) {
        let url = format!("memory://{name}");
        self.items
            .insert(name.to_string(), FetchResponse::ok(body, url));
    }

    pub fn insert_status(&mut self, name: &str, status: u16) {
        self.items.insert(
            name.to_string(),
            FetchResponse {
                status,
                body: Bytes::new(),
                url: format!("memory://{name}"),
            },
        );
    }
}

#[async_trait]
impl RemoteSource for InMemoryRemote {
    async fn fetch(&self, name: &str) -> MonitorResult<FetchResponse> {
        Ok(self.items.get(name).cloned().unwrap_or_else(|| FetchResponse {
            status: 404,
            body: Bytes::new(),
            url: format!("memory://{name}"),
        }))
    }
}
