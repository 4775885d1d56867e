use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use super::{SensorStore, StoreError};
use crate::{
    db::models::{NewSensor, Sensor, SensorChanges},
    temperature::TemperatureSource,
};

/// Sensor operations as seen by the API: store access plus live enrichment
/// of temperature sensors.
#[derive(Clone)]
pub struct SensorService {
    store: Arc<dyn SensorStore>,
    temperature: Arc<dyn TemperatureSource>,
}

impl SensorService {
    pub fn new(store: Arc<dyn SensorStore>, temperature: Arc<dyn TemperatureSource>) -> Self {
        Self { store, temperature }
    }

    /// All sensors by ascending id. Temperature sensors are enriched
    /// concurrently, so the list takes about one upstream timeout at worst.
    /// A failed upstream call only leaves that sensor at its stored reading.
    pub async fn list(&self) -> Result<Vec<Sensor>, StoreError> {
        let mut sensors = self.store.list().await?;
        join_all(sensors.iter_mut().map(|sensor| self.enrich(sensor))).await;
        Ok(sensors)
    }

    pub async fn get(&self, id: i32) -> Result<Sensor, StoreError> {
        let mut sensor = self.store.get(id).await?;
        self.enrich(&mut sensor).await;
        Ok(sensor)
    }

    pub async fn create(&self, new: NewSensor) -> Result<Sensor, StoreError> {
        self.store.create(new).await
    }

    pub async fn update(&self, id: i32, changes: SensorChanges) -> Result<Sensor, StoreError> {
        self.store.update(id, changes).await
    }

    pub async fn update_value(&self, id: i32, value: f64, status: &str) -> Result<(), StoreError> {
        self.store.update_value(id, value, status).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        self.store.delete(id).await
    }

    /// Overwrites `value`, `unit` and `last_updated` with a live reading.
    /// Never persisted. `last_updated` never goes below `created_at`, even
    /// when the upstream clock lags.
    async fn enrich(&self, sensor: &mut Sensor) {
        if !sensor.sensor_type.is_temperature() {
            return;
        }

        match self.temperature.fetch(&sensor.location).await {
            Ok(reading) => {
                debug!(sensor_id = sensor.id, value = reading.value, "Sensor enriched");
                sensor.value = reading.value;
                sensor.unit = reading.unit;
                sensor.last_updated = reading.timestamp.max(sensor.created_at);
            }
            Err(e) => {
                warn!(
                    sensor_id = sensor.id,
                    location = %sensor.location,
                    error = %e,
                    "Failed to get temperature, keeping stored reading"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::{
        db::models::SensorType,
        sensors::memory::MemorySensorStore,
        temperature::fake::{FixedTemperature, UnavailableTemperature},
    };

    fn new_sensor(name: &str, sensor_type: &str) -> NewSensor {
        NewSensor {
            name: name.into(),
            sensor_type: SensorType::from(sensor_type),
            location: name.to_lowercase(),
            unit: "C".into(),
        }
    }

    #[tokio::test]
    async fn get_enriches_temperature_sensor_without_persisting() {
        let store = Arc::new(MemorySensorStore::new());
        let mut upstream = FixedTemperature::new(23.4, "C");
        upstream.timestamp = Utc::now() + Duration::minutes(1);
        let service = SensorService::new(store.clone(), Arc::new(upstream.clone()));

        let created = service.create(new_sensor("Kitchen", "temperature")).await.unwrap();
        let got = service.get(created.id).await.unwrap();

        assert_eq!(got.value, 23.4);
        assert_eq!(got.last_updated, upstream.timestamp);
        assert_eq!(upstream.calls(), 1);

        let stored = store.get(created.id).await.unwrap();
        assert_eq!(stored.value, 0.0);
    }

    #[tokio::test]
    async fn non_temperature_sensors_skip_upstream() {
        let upstream = FixedTemperature::new(23.4, "C");
        let service =
            SensorService::new(Arc::new(MemorySensorStore::new()), Arc::new(upstream.clone()));

        let created = service.create(new_sensor("Door", "door")).await.unwrap();
        let got = service.get(created.id).await.unwrap();

        assert_eq!(got.value, 0.0);
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_keeps_stored_reading() {
        let store = Arc::new(MemorySensorStore::new());
        let service = SensorService::new(store.clone(), Arc::new(UnavailableTemperature));

        let created = service.create(new_sensor("Kitchen", "temperature")).await.unwrap();
        service.update_value(created.id, 21.5, "active").await.unwrap();
        let stored = store.get(created.id).await.unwrap();

        let got = service.get(created.id).await.unwrap();
        assert_eq!(got.value, 21.5);
        assert_eq!(got.unit, "C");
        assert_eq!(got.last_updated, stored.last_updated);
    }

    #[tokio::test]
    async fn stale_upstream_timestamp_is_clamped_to_created_at() {
        let mut upstream = FixedTemperature::new(12.0, "C");
        upstream.timestamp = Utc::now() - Duration::days(1);
        let service = SensorService::new(Arc::new(MemorySensorStore::new()), Arc::new(upstream));

        let created = service.create(new_sensor("Kitchen", "temperature")).await.unwrap();
        let got = service.get(created.id).await.unwrap();

        assert_eq!(got.value, 12.0);
        assert_eq!(got.last_updated, created.created_at);
        assert!(got.last_updated >= got.created_at);
    }

    #[tokio::test]
    async fn list_enriches_each_temperature_sensor() {
        let upstream = FixedTemperature::new(5.0, "F");
        let service =
            SensorService::new(Arc::new(MemorySensorStore::new()), Arc::new(upstream.clone()));

        service.create(new_sensor("Kitchen", "temperature")).await.unwrap();
        service.create(new_sensor("Door", "door")).await.unwrap();
        service.create(new_sensor("Attic", "temperature")).await.unwrap();

        let sensors = service.list().await.unwrap();
        assert_eq!(sensors.len(), 3);
        assert_eq!(upstream.calls(), 2);
        assert_eq!(sensors[0].unit, "F");
        assert_eq!(sensors[1].unit, "C");
        assert_eq!(sensors[2].value, 5.0);
    }
}
