// src/lib.rs
// Public library surface: poll the Home Front Command feeds and get a
// normalized `Alert` back.

pub mod alert;
pub mod category;
pub mod config;
pub mod error;
pub mod feed;
pub mod normalize;
pub mod parser;
pub mod poller;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::alert::{Alert, AlertType};
pub use crate::config::PollerConfig;
pub use crate::error::{AlertsError, Result};
pub use crate::feed::types::{FeedKind, FeedSource, RawFeedPayload};
pub use crate::poller::AlertPoller;

/// One-shot helper: poll with the default configuration.
///
/// ```ignore
/// let alert = oref_alerts::poll_active_alert().await?;
/// if alert.is_active() {
///     println!("{}: {}", alert.kind, alert.cities.join(", "));
/// }
/// ```
pub async fn poll_active_alert() -> Result<Alert> {
    AlertPoller::new(PollerConfig::default())?
        .poll_active_alert()
        .await
}
