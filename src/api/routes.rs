//! Router assembly for the Control API (C11).

use super::{handlers, AppState};
use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/devices", get(handlers::list_devices))
        .route("/devices/:mac", patch(handlers::edit_device))
        .route("/devices/:mac/ports", get(handlers::device_ports))
        .route("/devices/:mac/fingerprint", post(handlers::force_fingerprint))
        .route("/devices/:mac/important", post(handlers::mark_important))
        .route("/events", get(handlers::list_events))
        .route("/speed", get(handlers::list_speed_samples))
        .route("/modules", get(handlers::list_modules))
        .route("/store", delete(handlers::wipe_store))
        .route("/store/destroy", post(handlers::destroy_store))
        .route_layer(middleware::from_fn_with_state(state.clone(), super::auth::require_basic_auth));

    Router::new().merge(protected).with_state(state)
}
