//! HTTP route trees for the command gateway.

use axum::Router;

use crate::state::SharedState;

pub mod challenge;
pub mod docs;
pub mod health;
pub mod steps;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(steps::router())
        .merge(challenge::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
