use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;

use super::{SensorStore, StoreError};
use crate::db::models::{NewSensor, Sensor, SensorChanges};

const SENSOR_COLUMNS: &str =
    "id, name, type, location, value, unit, status, last_updated, created_at";

#[derive(Debug, Clone)]
pub struct PgSensorStore {
    pool: PgPool,
}

impl PgSensorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SensorStore for PgSensorStore {
    async fn list(&self) -> Result<Vec<Sensor>, StoreError> {
        let rows = sqlx::query_as::<_, Sensor>(&format!(
            "SELECT {SENSOR_COLUMNS} FROM sensors ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Sensor, StoreError> {
        sqlx::query_as::<_, Sensor>(&format!(
            "SELECT {SENSOR_COLUMNS} FROM sensors WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, new: NewSensor) -> Result<Sensor, StoreError> {
        let now = Utc::now();
        let sensor = sqlx::query_as::<_, Sensor>(&format!(
            r#"
            INSERT INTO sensors
                (name, type, location, value, unit, status, last_updated, created_at)
            VALUES ($1, $2, $3, $4, $5, 'inactive', $6, $6)
            RETURNING {SENSOR_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.sensor_type)
        .bind(&new.location)
        .bind(0.0_f64)
        .bind(&new.unit)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!(sensor_id = sensor.id, "Sensor created");
        Ok(sensor)
    }

    /// Not isolated against concurrent writers: two overlapping updates of
    /// the same id both read the old row and the later write wins.
    async fn update(&self, id: i32, changes: SensorChanges) -> Result<Sensor, StoreError> {
        let merged = self.get(id).await?.merge(changes, Utc::now());

        sqlx::query_as::<_, Sensor>(&format!(
            r#"
            UPDATE sensors
            SET name = $1, type = $2, location = $3, value = $4,
                unit = $5, status = $6, last_updated = $7
            WHERE id = $8
            RETURNING {SENSOR_COLUMNS}
            "#
        ))
        .bind(&merged.name)
        .bind(&merged.sensor_type)
        .bind(&merged.location)
        .bind(merged.value)
        .bind(&merged.unit)
        .bind(&merged.status)
        .bind(merged.last_updated)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        // Deleted between the read and the write.
        .ok_or(StoreError::NotFound(id))
    }

    async fn update_value(&self, id: i32, value: f64, status: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE sensors SET value = $1, status = $2, last_updated = $3 WHERE id = $4",
        )
        .bind(value)
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM sensors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
