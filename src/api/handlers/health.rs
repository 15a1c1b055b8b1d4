//! Health check endpoint.
//!
//! Reports liveness and the active channel. Provider reachability is not
//! probed; a health check must never send a notification.

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};

use crate::channels::ChannelKind;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Channel configuration is complete
    Healthy,
    /// Running, but invocations will be rejected with 400
    Degraded,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub channel: ChannelKind,
    /// Required channel values that are empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    /// RFC 3339 timestamp of the check
    pub timestamp: String,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let channel = &state.settings().channel;
    let missing = channel.missing_fields();

    Json(HealthResponse {
        status: if missing.is_empty() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        },
        version: crate::pkg_version().to_string(),
        channel: channel.kind,
        missing,
        timestamp: jiff::Timestamp::now().to_string(),
    })
}
