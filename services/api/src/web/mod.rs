pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

pub use middleware::require_auth;
pub use rest::{
    api_root_handler, create_selection_handler, delete_selection_handler,
    list_selections_handler, partial_update_selection_handler, retrieve_selection_handler,
    update_selection_handler,
};

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::web::auth::{delete_account_handler, login_handler, logout_handler, signup_handler};
use crate::web::state::AppState;

/// Builds the API router: open reads, authenticated writes.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(api_root_handler))
        .route("/selections/", get(list_selections_handler))
        .route("/selections/{id}/", get(retrieve_selection_handler))
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/selections/", post(create_selection_handler))
        .route(
            "/selections/{id}/",
            put(update_selection_handler)
                .patch(partial_update_selection_handler)
                .delete(delete_selection_handler),
        )
        .route("/auth/account", delete(delete_account_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
