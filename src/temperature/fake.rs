use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use super::{models::TemperatureReading, TemperatureError, TemperatureSource};

/// Returns the same reading for every location and counts calls.
#[derive(Clone)]
pub struct FixedTemperature {
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    calls: Arc<AtomicUsize>,
}

impl FixedTemperature {
    pub fn new(value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_owned(),
            timestamp: Utc::now(),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TemperatureSource for FixedTemperature {
    async fn fetch(&self, location: &str) -> Result<TemperatureReading, TemperatureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TemperatureReading {
            value: self.value,
            unit: self.unit.clone(),
            timestamp: self.timestamp,
            location: location.to_owned(),
        })
    }
}

/// Always answers as an upstream that is down.
#[derive(Clone, Copy, Default)]
pub struct UnavailableTemperature;

#[async_trait]
impl TemperatureSource for UnavailableTemperature {
    async fn fetch(&self, _location: &str) -> Result<TemperatureReading, TemperatureError> {
        Err(TemperatureError::UnexpectedStatus(StatusCode::SERVICE_UNAVAILABLE))
    }
}
