//! Quote API HTTP server
//!
//! This crate exposes CRUD operations over quotes as a JSON HTTP API backed
//! by any [`quotes_core::QuoteStore`].

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod tracing;

pub use api::{ErrorBody, HealthResponse, QuoteInput};
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use routes::app;
pub use state::AppState;
