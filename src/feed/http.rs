// src/feed/http.rs
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, PRAGMA, REFERER};
use reqwest::Client;

use crate::config::PollerConfig;
use crate::error::{AlertsError, Result};
use crate::feed::types::{FeedKind, FeedSource, RawFeedPayload};

/// Fetches the upstream feeds over HTTP with the browser-like header set
/// the upstream insists on.
#[derive(Clone)]
pub struct HttpFeedSource {
    client: Client,
    alerts_url: String,
    history_url: String,
}

impl HttpFeedSource {
    pub fn new(config: &PollerConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        headers.insert(
            REFERER,
            HeaderValue::from_str(&config.referer)
                .map_err(|e| AlertsError::configuration(format!("invalid referer: {e}")))?,
        );

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout());

        // Only the configured proxy is used; ambient HTTP(S)_PROXY is ignored.
        builder = match config.proxy.as_deref() {
            Some(proxy) => {
                let proxy = reqwest::Proxy::all(proxy)
                    .map_err(|e| AlertsError::configuration(format!("invalid proxy URL: {e}")))?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| AlertsError::configuration(format!("building HTTP client: {e}")))?;

        Ok(Self {
            client,
            alerts_url: config.alerts_url.clone(),
            history_url: config.history_url.clone(),
        })
    }

    fn url_for(&self, feed: FeedKind) -> &str {
        match feed {
            FeedKind::Live => &self.alerts_url,
            FeedKind::History => &self.history_url,
        }
    }
}

/// Append the current unix timestamp so no cache in between answers for us.
pub fn cache_busted(url: &str, unix_secs: i64) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{unix_secs}")
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, feed: FeedKind) -> Result<RawFeedPayload> {
        let url = cache_busted(self.url_for(feed), chrono::Utc::now().timestamp());
        tracing::debug!(feed = feed.as_str(), %url, "fetching feed");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?.to_vec();

        Ok(RawFeedPayload { status, bytes })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
