//! Moodcheck HTTP API: axum routes in front of the screening orchestrator.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
