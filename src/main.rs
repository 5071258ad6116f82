//! Alert status service: polls the Home Front Command feeds in the background
//! and serves the latest state over HTTP.

mod cooldown;
mod status;

use std::time::Duration;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use oref_alerts::{AlertPoller, PollerConfig};
use shuttle_axum::ShuttleAxum;
use tokio::task::JoinHandle;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cooldown::LocalityCooldown;
use crate::status::StatusState;

const ENV_POLL_INTERVAL_SECS: &str = "OREF_POLL_INTERVAL_SECS";
const ENV_COOLDOWN_SECS: &str = "OREF_COOLDOWN_SECS";

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Compact logs; the runtime may already have installed a subscriber.
fn enable_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("oref_alerts=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

/// Poll forever. A failed poll keeps the previous state for that cycle.
fn spawn_poll_loop(
    poller: AlertPoller,
    state: StatusState,
    interval: Duration,
    cooldown_secs: i64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut cooldown = LocalityCooldown::new(cooldown_secs);

        loop {
            ticker.tick().await;
            let now = chrono::Utc::now();
            match poller.poll_at(now).await {
                Ok(alert) => {
                    let fresh = cooldown.fresh_localities(&alert, now);
                    if !fresh.is_empty() {
                        tracing::info!(
                            target: "oref_alerts",
                            kind = %alert.kind,
                            cities = ?fresh,
                            instructions = alert.instructions.as_deref().unwrap_or_default(),
                            "new alert"
                        );
                    }
                    state.record(alert, now);
                }
                Err(e) => {
                    tracing::warn!(target: "oref_alerts", error = %e, "poll cycle failed");
                }
            }
        }
    })
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    enable_tracing();

    let config = PollerConfig::load_default().context("loading poller config")?;
    let poller = AlertPoller::new(config).context("building poller")?;

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("prometheus: install recorder")?;

    let state = StatusState::new(Some(metrics));
    let interval = Duration::from_secs(env_u64(ENV_POLL_INTERVAL_SECS, 5).max(1));
    let cooldown_secs = i64::try_from(env_u64(ENV_COOLDOWN_SECS, 60)).unwrap_or(i64::MAX);
    spawn_poll_loop(poller, state.clone(), interval, cooldown_secs);

    Ok(status::router(state).into())
}
