//! API route definitions

use axum::{
    routing::{get, post},
    Router,
    extract::Extension,
};
use tower_http::cors::CorsLayer;
use std::sync::Arc;
use crate::handlers::*;
use crate::web::index_page;
use sentinel2yaral_observability::{routes::monitoring_routes, HealthMonitor};

/// Create the main API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let monitor: Arc<dyn HealthMonitor> = state.monitoring.clone();

    Router::new()
        // Converter form page
        .route("/", get(index_page))

        // Health and status routes
        .route("/health", get(health_check))

        // Example rule routes
        .route("/api/examples", get(list_examples))
        .route("/api/examples/:name", get(get_example))

        // Model routes
        .route("/api/models", get(list_models))

        // Conversion route
        .route("/api/convert", post(convert))

        // Monitoring routes (observability crate)
        .nest("/monitoring", monitoring_routes(monitor))

        // Apply middleware
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
