use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;
use utoipa::OpenApi;

use super::{
    dto::{
        CreateSensorRequest, ErrorResponse, MessageResponse, SensorDto, UpdateSensorRequest,
        UpdateValueRequest,
    },
    errors::AppError,
};
use crate::{
    db::models::{NewSensor, SensorChanges},
    sensors::SensorService,
};

fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation("invalid sensor ID".to_owned()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// List every sensor by ascending id. Temperature sensors carry a live
/// reading when the upstream answers, their stored one otherwise.
#[utoipa::path(
    get,
    path = "/api/v1/sensors",
    responses(
        (status = 200, description = "All sensors", body = Vec<SensorDto>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sensors"
)]
pub async fn list_sensors(
    State(service): State<SensorService>,
) -> Result<Json<Vec<SensorDto>>, AppError> {
    let sensors = service.list().await?;
    Ok(Json(sensors.into_iter().map(Into::into).collect()))
}

/// Fetch one sensor, enriched like in the listing.
#[utoipa::path(
    get,
    path = "/api/v1/sensors/{id}",
    params(("id" = i32, Path, description = "Sensor ID")),
    responses(
        (status = 200, description = "Sensor", body = SensorDto),
        (status = 400, description = "Invalid sensor ID", body = ErrorResponse),
        (status = 404, description = "Sensor not found", body = ErrorResponse),
    ),
    tag = "sensors"
)]
pub async fn get_sensor(
    State(service): State<SensorService>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<SensorDto>, AppError> {
    let Path(id) = path?;
    let id = parse_id(&id)?;
    let sensor = service.get(id).await?;
    Ok(Json(sensor.into()))
}

/// Create a sensor. It starts `inactive` with a value of 0.
#[utoipa::path(
    post,
    path = "/api/v1/sensors",
    request_body = CreateSensorRequest,
    responses(
        (status = 201, description = "Sensor created", body = SensorDto),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sensors"
)]
pub async fn create_sensor(
    State(service): State<SensorService>,
    payload: Result<Json<CreateSensorRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SensorDto>), AppError> {
    let Json(req) = payload?;
    let new = NewSensor::try_from(req)?;
    let sensor = service.create(new).await?;
    info!(sensor_id = sensor.id, sensor_type = %sensor.sensor_type, "Sensor created");
    Ok((StatusCode::CREATED, Json(sensor.into())))
}

/// Merge-update a sensor: only the supplied fields change.
#[utoipa::path(
    put,
    path = "/api/v1/sensors/{id}",
    params(("id" = i32, Path, description = "Sensor ID")),
    request_body = UpdateSensorRequest,
    responses(
        (status = 200, description = "Updated sensor", body = SensorDto),
        (status = 400, description = "Invalid ID or body", body = ErrorResponse),
        (status = 404, description = "Sensor not found", body = ErrorResponse),
    ),
    tag = "sensors"
)]
pub async fn update_sensor(
    State(service): State<SensorService>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateSensorRequest>, JsonRejection>,
) -> Result<Json<SensorDto>, AppError> {
    let Path(id) = path?;
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let changes = SensorChanges::try_from(req)?;
    let sensor = service.update(id, changes).await?;
    Ok(Json(sensor.into()))
}

/// Record a new value. `status` defaults to `active`.
#[utoipa::path(
    patch,
    path = "/api/v1/sensors/{id}/value",
    params(("id" = i32, Path, description = "Sensor ID")),
    request_body = UpdateValueRequest,
    responses(
        (status = 200, description = "Value updated", body = MessageResponse),
        (status = 400, description = "Invalid ID or body", body = ErrorResponse),
        (status = 404, description = "Sensor not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sensors"
)]
pub async fn update_sensor_value(
    State(service): State<SensorService>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateValueRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = path?;
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    service
        .update_value(id, req.value, req.status_or_default())
        .await?;
    Ok(Json(MessageResponse {
        message: "Sensor value updated successfully".to_owned(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/sensors/{id}",
    params(("id" = i32, Path, description = "Sensor ID")),
    responses(
        (status = 204, description = "Sensor deleted"),
        (status = 400, description = "Invalid sensor ID", body = ErrorResponse),
        (status = 404, description = "Sensor not found", body = ErrorResponse),
    ),
    tag = "sensors"
)]
pub async fn delete_sensor(
    State(service): State<SensorService>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    let id = parse_id(&id)?;
    service.delete(id).await?;
    info!(sensor_id = id, "Sensor deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        list_sensors,
        get_sensor,
        create_sensor,
        update_sensor,
        update_sensor_value,
        delete_sensor,
        health
    ),
    components(schemas(
        SensorDto,
        CreateSensorRequest,
        UpdateSensorRequest,
        UpdateValueRequest,
        MessageResponse,
        ErrorResponse
    )),
    tags(
        (name = "sensors", description = "Sensor CRUD endpoints"),
        (name = "system",  description = "System endpoints"),
    ),
    info(
        title = "Smart Home Sensor API",
        version = "0.1.0",
        description = "REST API for smart home sensors with live temperature readings"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
