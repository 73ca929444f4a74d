//! Route definitions for the letter quotation server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Price list (public)
        .route("/catalog", get(handlers::get_catalog))
        // Auth routes
        .nest("/auth", auth_routes(state.clone()))
        // Quotation routes
        .nest("/quotes", quote_routes(state))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(
            Router::new()
                .route("/password", post(handlers::change_password))
                .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

/// Quotation routes (protected, except the live estimate)
fn quote_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/estimate", post(handlers::estimate_quote))
        .merge(
            Router::new()
                .route("/", get(handlers::list_quotes).post(handlers::create_quote))
                .route(
                    "/:id",
                    get(handlers::get_quote).delete(handlers::delete_quote),
                )
                .route("/:id/duplicate", post(handlers::duplicate_quote))
                .route("/:id/export", get(handlers::export_quote))
                .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}
