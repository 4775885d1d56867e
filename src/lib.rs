//! Smart home sensor service: CRUD over a `sensors` table plus live
//! temperature readings from an upstream HTTP service.

pub mod api;
pub mod config;
pub mod db;
pub mod sensors;
pub mod temperature;
