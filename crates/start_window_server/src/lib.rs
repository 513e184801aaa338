//! HTTP render service for the event start-date window.
//!
//! The host calls `/render` once per form render and enqueues whatever comes
//! back; nothing is cached between requests.

use std::sync::Arc;
use std::time::Duration;

use axum::debug_handler;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tower_http::timeout::TimeoutLayer;

use start_window::assets::check_environment;
use start_window::timezone::{Tz, parse_timezone};
use start_window::{AssetBundle, DisabledDays, Extension, RenderContext, ScriptVars, User};

pub mod error;

pub use error::{ServerError, ServerResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AppState {
    pub extension: Extension,
    pub metrics: Option<PrometheusHandle>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RenderRequest {
    pub context: RenderContext,
    /// Capabilities of the user viewing the form.
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Host runtime version, checked against the configured minimum.
    #[serde(default)]
    pub host_version: Option<String>,
    /// Render time; the server clock when absent.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RenderResponse {
    #[serde(flatten)]
    pub bundle: AssetBundle,
    pub style: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DisabledDaysRequest {
    #[serde(default)]
    pub prior: Option<DisabledDays>,
    pub vars: ScriptVars,
    /// Zone of the browser rendering the calendar; UTC when absent.
    #[serde(default)]
    pub viewer_time_zone: Option<String>,
}

#[debug_handler]
async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[debug_handler]
async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(|m| m.render())
        .unwrap_or_default();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

#[debug_handler]
async fn validation_style(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [("content-type", "text/html; charset=utf-8")],
        state.extension.validation_style(),
    )
}

#[debug_handler]
async fn script_vars_schema() -> Json<serde_json::Value> {
    Json(ScriptVars::json_schema())
}

#[debug_handler]
async fn render(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenderRequest>,
) -> ServerResult<Response> {
    if let Some(version) = req.host_version.as_deref() {
        check_environment(&state.extension.config().min_host_version, version)?;
    }

    let user = User::with_capabilities(req.capabilities);
    let now = req.now.unwrap_or_else(Utc::now);
    match state.extension.render(&req.context, &user, now) {
        Some(bundle) => {
            metrics::counter!("start_window_renders_total").increment(1);
            tracing::debug!(min_date = bundle.vars.min_date, max_date = ?bundle.vars.max_date, "rendered start window");
            let body = RenderResponse {
                bundle,
                style: state.extension.validation_style(),
            };
            Ok(Json(body).into_response())
        }
        None => {
            metrics::counter!("start_window_skipped_total").increment(1);
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

#[debug_handler]
async fn disabled_days(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DisabledDaysRequest>,
) -> ServerResult<Json<Option<DisabledDays>>> {
    let viewer_tz = match req.viewer_time_zone.as_deref() {
        Some(name) => parse_timezone(name)?,
        None => Tz::UTC,
    };
    Ok(Json(
        state.extension.disabled_days(req.prior, &req.vars, viewer_tz),
    ))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/validation-style", get(validation_style))
        .route("/schema/script-vars", get(script_vars_schema))
        .route("/render", post(render))
        .route("/disabled-days", post(disabled_days))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}
