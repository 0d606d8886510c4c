//! Client for a third-party JSON rail API.
//!
//! The API mirrors the ticketing site's search results. It is unofficial:
//! requests carry a fixed API key and a device id header, and present a
//! randomly chosen browser fingerprint to reduce blocking.
//!
//! Unlike the browser-driven search, this source exposes no operating
//! days or arrival dates at this call shape.

mod client;
mod convert;
mod error;
mod headers;
mod types;

pub use client::{RailApiClient, RailApiConfig, RailApiQuery};
pub use convert::{ProxyTrain, convert_trains};
pub use error::RailApiError;
pub use headers::{HeaderProfile, PROFILES};
pub use types::{ApiTrain, TrainSearchData, TrainSearchResponse};
