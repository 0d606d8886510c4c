//! Web layer for the train search service.
//!
//! Mounts either the browser-driven or the API-backed search endpoints,
//! plus health and endpoint documentation.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{ApiState, AppState, ScrapeState};
