//! Request and Response models for the image proxy API
//!
//! Parsed request paths and JSON bodies for the auxiliary endpoints.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::FillRequest;
pub use responses::{HealthResponse, StatsResponse};
