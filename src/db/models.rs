use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, FromRow, Postgres, Type,
};

/// Kind of a sensor as stored in the `type` column.
///
/// Only `temperature` carries behaviour (upstream enrichment); every other
/// label is kept verbatim so clients can store whatever kinds they need.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SensorType {
    Temperature,
    Other(String),
}

impl SensorType {
    pub fn as_str(&self) -> &str {
        match self {
            SensorType::Temperature => "temperature",
            SensorType::Other(s) => s,
        }
    }

    pub fn is_temperature(&self) -> bool {
        matches!(self, SensorType::Temperature)
    }
}

impl From<String> for SensorType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "temperature" => SensorType::Temperature,
            _ => SensorType::Other(s),
        }
    }
}

impl From<&str> for SensorType {
    fn from(s: &str) -> Self {
        SensorType::from(s.to_owned())
    }
}

impl From<SensorType> for String {
    fn from(t: SensorType) -> Self {
        match t {
            SensorType::Temperature => "temperature".to_owned(),
            SensorType::Other(s) => s,
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Stored as plain TEXT; the enum only exists on the Rust side.
impl Type<Postgres> for SensorType {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
    }
}

impl Encode<'_, Postgres> for SensorType {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, Postgres> for SensorType {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let s = <String as Decode<Postgres>>::decode(value)?;
        Ok(SensorType::from(s))
    }
}

/// One row of the `sensors` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Sensor {
    pub id: i32,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub location: String,
    pub value: f64,
    pub unit: String,
    /// `active` / `inactive`; new sensors start out `inactive`.
    pub status: String,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a sensor.
#[derive(Debug, Clone)]
pub struct NewSensor {
    pub name: String,
    pub sensor_type: SensorType,
    pub location: String,
    pub unit: String,
}

/// Partial update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SensorChanges {
    pub name: Option<String>,
    pub sensor_type: Option<SensorType>,
    pub location: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub status: Option<String>,
}

impl Sensor {
    /// Applies `changes` on top of the current fields and bumps `last_updated`.
    pub fn merge(mut self, changes: SensorChanges, now: DateTime<Utc>) -> Self {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(sensor_type) = changes.sensor_type {
            self.sensor_type = sensor_type;
        }
        if let Some(location) = changes.location {
            self.location = location;
        }
        if let Some(value) = changes.value {
            self.value = value;
        }
        if let Some(unit) = changes.unit {
            self.unit = unit;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.last_updated = now;
        self
    }
}
