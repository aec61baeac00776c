// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Notes resource
        .route(
            "/api/notes",
            get(crate::handlers::notes::list_notes).post(crate::handlers::notes::create_note),
        )
        .route(
            "/api/notes/{id}",
            get(crate::handlers::notes::get_note)
                .put(crate::handlers::notes::update_note)
                .delete(crate::handlers::notes::delete_note),
        )
        // Registration and login
        .route(
            "/api/users",
            get(crate::handlers::users::list_users).post(crate::handlers::users::register_user),
        )
        .route("/api/login", post(crate::handlers::login::login))
        // Liveness probe
        .route("/health", get(crate::handlers::health::health_handler))
        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)
        .with_state(state)
}
