use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{SensorStore, StoreError};
use crate::db::models::{NewSensor, Sensor, SensorChanges};

/// In-memory `SensorStore` for handler tests. Ids are assigned sequentially.
#[derive(Clone, Default)]
pub struct MemorySensorStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    next_id: i32,
    rows: BTreeMap<i32, Sensor>,
}

impl MemorySensorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SensorStore for MemorySensorStore {
    async fn list(&self) -> Result<Vec<Sensor>, StoreError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Sensor, StoreError> {
        self.inner
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, new: NewSensor) -> Result<Sensor, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let now = Utc::now();
        let sensor = Sensor {
            id: inner.next_id,
            name: new.name,
            sensor_type: new.sensor_type,
            location: new.location,
            value: 0.0,
            unit: new.unit,
            status: "inactive".to_owned(),
            last_updated: now,
            created_at: now,
        };
        inner.rows.insert(sensor.id, sensor.clone());
        Ok(sensor)
    }

    async fn update(&self, id: i32, changes: SensorChanges) -> Result<Sensor, StoreError> {
        let mut inner = self.inner.write().await;
        let current = inner.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))?;
        let merged = current.merge(changes, Utc::now());
        inner.rows.insert(id, merged.clone());
        Ok(merged)
    }

    async fn update_value(&self, id: i32, value: f64, status: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let row = inner.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        row.value = value;
        row.status = status.to_owned();
        row.last_updated = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
