//! Scrape search pipeline: validate the date, fetch the rendered results,
//! normalize them.

use futures::future::BoxFuture;
use tracing::{error, info};

use crate::domain::{JourneyDate, StationRef};
use crate::normalize::{PageContext, SearchResult, normalize_results_page};

use super::error::ScrapeError;

/// What to search for, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeQuery {
    pub from_code: String,
    pub to_code: String,
    pub journey_date: JourneyDate,
}

/// The rendered results page plus the stations the form resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPage {
    pub origin: StationRef,
    pub destination: StationRef,
    pub html: String,
}

/// Something that can produce a rendered results page for a query.
pub trait TrainScraper: Send + Sync {
    fn scrape<'a>(
        &'a self,
        query: &'a ScrapeQuery,
    ) -> BoxFuture<'a, Result<ScrapedPage, ScrapeError>>;
}

/// Run a full search. Never fails: errors become a failed [`SearchResult`].
///
/// An unparseable date aborts before the scraper is touched.
pub async fn search_trains<S: TrainScraper + ?Sized>(
    scraper: &S,
    from_code: &str,
    to_code: &str,
    journey_date: &str,
) -> SearchResult {
    let journey_date = match JourneyDate::parse(journey_date) {
        Ok(date) => date,
        Err(e) => {
            error!(error = %e, "rejecting search");
            return SearchResult::failed(e.to_string());
        }
    };

    let query = ScrapeQuery {
        from_code: from_code.to_string(),
        to_code: to_code.to_string(),
        journey_date,
    };
    info!(from = %query.from_code, to = %query.to_code, date = %journey_date, "searching trains");

    let page = match scraper.scrape(&query).await {
        Ok(page) => page,
        Err(e) => {
            error!(error = %e, "scrape failed");
            return SearchResult::failed(e.to_string());
        }
    };

    let ctx = PageContext {
        journey_date,
        origin: page.origin,
        destination: page.destination,
    };
    normalize_results_page(&page.html, &ctx)
}
