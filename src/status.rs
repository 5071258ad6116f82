// src/status.rs
// Status routes for devices that just want to know "is there an alert now".

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use shuttle_axum::axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tower_http::cors::CorsLayer;

use oref_alerts::Alert;

#[derive(Debug, Default)]
struct StatusInner {
    latest: Alert,
    manual: bool,
    updated_at: Option<DateTime<Utc>>,
}

/// Latest poll result plus the manual trigger flag.
#[derive(Clone, Default)]
pub struct StatusState {
    inner: Arc<RwLock<StatusInner>>,
    metrics: Option<PrometheusHandle>,
}

impl StatusState {
    pub fn new(metrics: Option<PrometheusHandle>) -> Self {
        Self {
            inner: Arc::default(),
            metrics,
        }
    }

    pub fn record(&self, alert: Alert, now: DateTime<Utc>) {
        if let Ok(mut g) = self.inner.write() {
            g.latest = alert;
            g.updated_at = Some(now);
        }
    }

    fn set_manual(&self, on: bool) {
        if let Ok(mut g) = self.inner.write() {
            g.manual = on;
            if !on {
                g.latest = Alert::none();
            }
        }
    }

    pub fn is_alert(&self) -> bool {
        self.inner
            .read()
            .map(|g| g.manual || g.latest.is_active())
            .unwrap_or(false)
    }
}

pub fn router(state: StatusState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/alertStatus", get(alert_status))
        .route("/alert", get(latest_alert))
        .route("/triggerAlert", get(trigger_alert))
        .route("/clearAlert", get(clear_alert))
        .route("/metrics", get(render_metrics))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn alert_status(State(state): State<StatusState>) -> &'static str {
    if state.is_alert() {
        "ALERT"
    } else {
        "NO ALERT"
    }
}

#[derive(serde::Serialize)]
struct AlertOut {
    alert: Alert,
    manual: bool,
    updated_at: Option<DateTime<Utc>>,
}

async fn latest_alert(State(state): State<StatusState>) -> Result<Json<AlertOut>, StatusCode> {
    let g = state
        .inner
        .read()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(AlertOut {
        alert: g.latest.clone(),
        manual: g.manual,
        updated_at: g.updated_at,
    }))
}

async fn trigger_alert(State(state): State<StatusState>) -> &'static str {
    state.set_manual(true);
    "Alert triggered"
}

async fn clear_alert(State(state): State<StatusState>) -> &'static str {
    state.set_manual(false);
    "Alert cleared"
}

async fn render_metrics(State(state): State<StatusState>) -> Result<String, StatusCode> {
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .ok_or(StatusCode::NOT_FOUND)
}
