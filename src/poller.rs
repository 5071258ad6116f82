//! Poll entry points.
//!
//! `poll_active_alert` asks the live feed first. Only a well-formed "nothing
//! active" answer sends it to the history feed, and only once per call;
//! a failing live feed is reported as-is.

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use std::sync::Arc;

use crate::alert::{Alert, AlertType};
use crate::config::PollerConfig;
use crate::error::Result;
use crate::feed::fetch_text;
use crate::feed::http::HttpFeedSource;
use crate::feed::types::{FeedKind, FeedSource};
use crate::normalize::{extract_zones, normalize_live, normalize_record};
use crate::parser::{parse_feed, ParsedFeedRecord};
use crate::telemetry;

/// Stateless poller; every call does its own request(s) and builds a fresh result.
#[derive(Clone)]
pub struct AlertPoller {
    source: Arc<dyn FeedSource>,
    config: PollerConfig,
}

impl AlertPoller {
    /// Poller over HTTP using `config`'s endpoints, proxy and timeouts.
    pub fn new(config: PollerConfig) -> Result<Self> {
        config.validate()?;
        let source = HttpFeedSource::new(&config)?;
        Ok(Self::with_source(Arc::new(source), config))
    }

    pub fn with_source(source: Arc<dyn FeedSource>, config: PollerConfig) -> Self {
        telemetry::ensure_metrics_described();
        Self { source, config }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    fn history_window(&self) -> Duration {
        i64::try_from(self.config.history_window_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }

    async fn fetch_record(&self, feed: FeedKind) -> Result<ParsedFeedRecord> {
        counter!(telemetry::POLLS_TOTAL, "feed" => feed.as_str()).increment(1);
        let res = fetch_text(self.source.as_ref(), feed)
            .await
            .and_then(|text| parse_feed(&text));
        if let Err(e) = &res {
            tracing::warn!(feed = feed.as_str(), kind = e.kind(), error = %e, "poll failed");
            counter!(
                telemetry::POLL_ERRORS_TOTAL,
                "feed" => feed.as_str(),
                "kind" => e.kind()
            )
            .increment(1);
        }
        res
    }

    async fn poll_feed(&self, feed: FeedKind, now: DateTime<Utc>) -> Result<Alert> {
        let record = self.fetch_record(feed).await?;
        Ok(normalize_record(&record, now, self.history_window()))
    }

    /// Current alert, falling back to recent history when the live feed is quiet.
    pub async fn poll_active_alert(&self) -> Result<Alert> {
        self.poll_at(Utc::now()).await
    }

    /// [`poll_active_alert`](Self::poll_active_alert) with an explicit clock for
    /// the history recency window.
    pub async fn poll_at(&self, now: DateTime<Utc>) -> Result<Alert> {
        let alert = self.poll_feed(FeedKind::Live, now).await?;
        if alert.kind != AlertType::None {
            return Ok(alert);
        }

        tracing::debug!("live feed quiet, checking alert history");
        counter!(telemetry::HISTORY_FALLBACK_TOTAL).increment(1);
        self.poll_feed(FeedKind::History, now).await
    }

    /// Localities named by the live feed, without classification or fallback.
    pub async fn poll_active_rocket_alert_cities(&self) -> Result<Vec<String>> {
        match self.fetch_record(FeedKind::Live).await? {
            ParsedFeedRecord::Live(live) => Ok(normalize_live(&live).cities),
            ParsedFeedRecord::History(_) => Ok(Vec::new()),
        }
    }

    /// Zone codes named by the live feed.
    pub async fn poll_active_rocket_alert_zones(&self) -> Result<Vec<String>> {
        let record = self.fetch_record(FeedKind::Live).await?;
        Ok(extract_zones(&record))
    }
}
