use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use super::handlers;
use crate::domain::service::Service;

/// Register the calculator REST routes on `router`.
///
/// Calculation and history routes are served both at the root and under
/// `/calculator`. Unmatched paths get a structured 404.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let calculator = Router::new()
        .route("/calculate", post(handlers::calculate))
        .route(
            "/history",
            get(handlers::list_history).delete(handlers::clear_history),
        );

    router
        .merge(calculator.clone())
        .nest("/calculator", calculator)
        .route("/operations", get(handlers::list_operations))
        .route("/health", get(handlers::health))
        .route("/openapi.json", get(handlers::openapi_json))
        .fallback(handlers::not_found)
        .layer(Extension(service))
}
