use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use leadmachine_core::health::{healthz, readyz};
use leadmachine_core::middleware::request_id_layer;

use crate::handlers::{
    access_code::{create_access_code, list_valid_codes, purge_expired_codes},
    session::{check_session, create_session, delete_session},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Access codes
        .route("/auth/code", post(create_access_code))
        .route("/auth/codes", get(list_valid_codes))
        .route("/auth/codes/expired", delete(purge_expired_codes))
        // Session
        .route("/auth/session", post(create_session))
        .route("/auth/session", get(check_session))
        .route("/auth/session", delete(delete_session))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
