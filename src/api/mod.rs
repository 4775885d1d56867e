pub mod dto;
pub mod errors;
pub mod handlers;

use std::time::Duration;

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::sensors::SensorService;
use handlers::ApiDoc;

pub fn router(service: SensorService) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route(
            "/api/v1/sensors",
            get(handlers::list_sensors).post(handlers::create_sensor),
        )
        .route(
            "/api/v1/sensors/{id}",
            get(handlers::get_sensor)
                .put(handlers::update_sensor)
                .delete(handlers::delete_sensor),
        )
        .route(
            "/api/v1/sensors/{id}/value",
            patch(handlers::update_sensor_value),
        )
        .with_state(service)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}

/// `router` plus request tracing and a per-request deadline. Requests that
/// exceed `request_timeout` are dropped mid-flight and answered with 408.
pub fn app(service: SensorService, request_timeout: Duration) -> Router {
    router(service)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
