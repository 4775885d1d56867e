use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::AppError;
use crate::db::models::{NewSensor, Sensor, SensorChanges, SensorType};

/// Status written by `PATCH /sensors/{id}/value` when the body omits one.
pub const DEFAULT_VALUE_STATUS: &str = "active";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SensorDto {
    pub id: i32,
    pub name: String,
    /// `temperature` sensors are enriched with a live upstream reading.
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub location: String,
    pub value: f64,
    pub unit: String,
    pub status: String,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<Sensor> for SensorDto {
    fn from(s: Sensor) -> Self {
        Self {
            id: s.id,
            name: s.name,
            sensor_type: s.sensor_type.into(),
            location: s.location,
            value: s.value,
            unit: s.unit,
            status: s.status,
            last_updated: s.last_updated,
            created_at: s.created_at,
        }
    }
}

/// Request body for `POST /sensors`. All fields are required and non-blank.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSensorRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub location: String,
    pub unit: String,
}

impl TryFrom<CreateSensorRequest> for NewSensor {
    type Error = AppError;

    fn try_from(req: CreateSensorRequest) -> Result<Self, AppError> {
        Ok(NewSensor {
            name: non_blank("name", req.name)?,
            sensor_type: SensorType::from(non_blank("type", req.sensor_type)?),
            location: non_blank("location", req.location)?,
            unit: non_blank("unit", req.unit)?,
        })
    }
}

/// Request body for `PUT /sensors/{id}`.
///
/// Absent or `null` fields keep their stored value. Supplied strings must be
/// non-blank; `value: 0` is a real update, not "unchanged".
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSensorRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub sensor_type: Option<String>,
    pub location: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<UpdateSensorRequest> for SensorChanges {
    type Error = AppError;

    fn try_from(req: UpdateSensorRequest) -> Result<Self, AppError> {
        Ok(SensorChanges {
            name: req.name.map(|v| non_blank("name", v)).transpose()?,
            sensor_type: req
                .sensor_type
                .map(|v| non_blank("type", v).map(SensorType::from))
                .transpose()?,
            location: req.location.map(|v| non_blank("location", v)).transpose()?,
            value: req.value,
            unit: req.unit.map(|v| non_blank("unit", v)).transpose()?,
            status: req.status.map(|v| non_blank("status", v)).transpose()?,
        })
    }
}

/// Request body for `PATCH /sensors/{id}/value`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateValueRequest {
    pub value: f64,
    /// Defaults to `active` when absent or empty.
    pub status: Option<String>,
}

impl UpdateValueRequest {
    pub fn status_or_default(&self) -> &str {
        match self.status.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => DEFAULT_VALUE_STATUS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

fn non_blank(field: &str, value: String) -> Result<String, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(value)
}
