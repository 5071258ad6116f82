// src/feed/mod.rs
pub mod decode;
pub mod fixture;
pub mod http;
pub mod types;

use metrics::histogram;

use crate::error::Result;
use crate::feed::types::{FeedKind, FeedSource};
use crate::telemetry;

/// Fetch one feed and decode it to text. Empty text means the feed had no data.
pub async fn fetch_text(source: &dyn FeedSource, feed: FeedKind) -> Result<String> {
    let t0 = std::time::Instant::now();
    let payload = source.fetch(feed).await?;
    let text = decode::decode_payload(&payload)?;

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!(telemetry::FETCH_MS, "feed" => feed.as_str()).record(ms);
    tracing::debug!(
        feed = feed.as_str(),
        source = source.name(),
        status = payload.status,
        bytes = payload.bytes.len(),
        chars = text.chars().count(),
        "feed decoded"
    );
    Ok(text)
}
