pub mod service;
pub mod store;

#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;

use crate::db::models::{NewSensor, Sensor, SensorChanges};

pub use self::service::SensorService;
pub use self::store::PgSensorStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sensor {0} not found")]
    NotFound(i32),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence operations over the `sensors` table.
///
/// Dropping a returned future cancels the underlying statement, so callers
/// bound execution time by wrapping calls in a timeout.
#[async_trait]
pub trait SensorStore: Send + Sync {
    /// All sensors ordered by ascending id.
    async fn list(&self) -> Result<Vec<Sensor>, StoreError>;

    async fn get(&self, id: i32) -> Result<Sensor, StoreError>;

    /// Inserts with `value = 0`, `status = "inactive"` and both timestamps set to now.
    async fn create(&self, new: NewSensor) -> Result<Sensor, StoreError>;

    /// Read-merge-write of the supplied fields; `last_updated` is always bumped.
    async fn update(&self, id: i32, changes: SensorChanges) -> Result<Sensor, StoreError>;

    /// Overwrites `value`, `status` and `last_updated` only.
    async fn update_value(&self, id: i32, value: f64, status: &str) -> Result<(), StoreError>;

    async fn delete(&self, id: i32) -> Result<(), StoreError>;
}
