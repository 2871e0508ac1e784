//! Health reporting backed by the persistence degraded flag.

use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with the current health, logging when persistence is failing.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if state.is_degraded() {
        warn!("snapshot persistence is failing (degraded mode)");
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
