use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `GET /temperature` on the upstream service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    /// Echo of the `location` query parameter.
    pub location: String,
}
