//! Operational HTTP endpoints.

pub mod status;

pub use status::{
    health_handler, metrics_handler, status_handler, status_router, HealthResponse,
    StatusResponse,
};
