//! Application state for the web layer.

use std::sync::Arc;

use crate::irctc::TrainScraper;
use crate::railapi::RailApiClient;

/// State for the browser-driven search routes.
#[derive(Clone)]
pub struct ScrapeState {
    pub scraper: Arc<dyn TrainScraper>,
}

/// State for the API-backed search route.
#[derive(Clone)]
pub struct ApiState {
    pub client: Arc<RailApiClient>,
}

/// Shared application state.
///
/// Exactly one search backend is mounted per process; the variant decides
/// which routes the router exposes.
#[derive(Clone)]
pub enum AppState {
    Scrape(ScrapeState),
    Api(ApiState),
}

impl AppState {
    /// State serving search through a browser scraper.
    pub fn scrape(scraper: impl TrainScraper + 'static) -> Self {
        AppState::Scrape(ScrapeState {
            scraper: Arc::new(scraper),
        })
    }

    /// State serving search through the rail API.
    pub fn api(client: RailApiClient) -> Self {
        AppState::Api(ApiState {
            client: Arc::new(client),
        })
    }
}
