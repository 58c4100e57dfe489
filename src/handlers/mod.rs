//! HTTP monitoring handlers

pub mod status;

pub use status::{health_handler, status_handler, AppState, HealthResponse, StatusResponse};
