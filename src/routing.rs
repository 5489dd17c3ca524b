//! Application router configuration.

use axum::{Router, routing::post};

use crate::{AppState, endpoints, user::sync_user_endpoint};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::SYNC_USER, post(sync_user_endpoint))
        .with_state(state)
}
