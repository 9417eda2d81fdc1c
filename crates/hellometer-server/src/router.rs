//! Axum router wiring.
//!
//! Business route, ops routes, and the scrape route (path from config), all
//! wrapped by the request timing middleware.

use axum::{middleware, routing::get, Router};

use crate::{api, app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    let metrics_path = state.cfg().metrics.path.clone();

    Router::new()
        .route("/api/hello", get(api::hello::hello))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route(&metrics_path, get(ops::metrics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::http::track_requests,
        ))
        .with_state(state)
}
