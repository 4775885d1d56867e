//! Stand-in for the upstream temperature service, used for local runs and tests.

use axum::{extract::Query, routing::get, Json, Router};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use tracing::debug;

use super::models::TemperatureReading;

pub const MIN_CELSIUS: f64 = -25.0;
pub const MAX_CELSIUS: f64 = 35.0;

#[derive(Debug, Deserialize)]
pub struct TemperatureParams {
    pub location: String,
}

pub fn router() -> Router {
    Router::new().route("/temperature", get(get_temperature))
}

/// A missing `location` is rejected by the `Query` extractor with 400.
async fn get_temperature(Query(params): Query<TemperatureParams>) -> Json<TemperatureReading> {
    let reading = simulate(&params.location, &mut rand::thread_rng());
    debug!(location = %reading.location, value = reading.value, "Simulated temperature");
    Json(reading)
}

/// Random reading in `[MIN_CELSIUS, MAX_CELSIUS]`, rounded to one decimal.
pub fn simulate(location: &str, rng: &mut impl Rng) -> TemperatureReading {
    let raw: f64 = rng.gen_range(MIN_CELSIUS..=MAX_CELSIUS);
    TemperatureReading {
        value: (raw * 10.0).round() / 10.0,
        unit: "C".to_owned(),
        timestamp: Utc::now(),
        location: location.to_owned(),
    }
}
