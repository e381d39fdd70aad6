//! Route definitions for the GhostRepo HTTP API.
//!
//! All routes are organized by audience and mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with its per-route middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .merge(owner_routes())
        .merge(visitor_routes())
        .merge(checkout_routes())
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Share collection and per-token routes. Listing, creating, updating and
/// deleting need an owner session; reading the tree is the visitor view.
fn owner_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shares",
            get(handlers::share::list_shares).post(handlers::share::create_share),
        )
        .route(
            "/shares/{token}",
            patch(handlers::share::update_share)
                .delete(handlers::share::delete_share)
                .get(handlers::content::get_tree),
        )
}

/// Visitor gate and content endpoints
fn visitor_routes() -> Router<AppState> {
    Router::new()
        .route("/shares/check-access", post(handlers::access::check_access))
        .route("/shares/file", get(handlers::content::get_file))
        .route(
            "/shares/{token}/validate",
            post(handlers::access::validate_share),
        )
        .route("/shares/{token}/redeem", post(handlers::access::redeem_grant))
        .route(
            "/shares/{token}/hierarchy",
            get(handlers::content::get_hierarchy),
        )
        .route(
            "/shares/{token}/branches",
            get(handlers::content::list_branches),
        )
        .route("/shares/{token}/zip", get(handlers::content::download_zip))
}

/// Payment round-trip
fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/stripe/checkout", post(handlers::stripe::create_checkout))
        .route("/stripe/success", get(handlers::stripe::checkout_success))
}
