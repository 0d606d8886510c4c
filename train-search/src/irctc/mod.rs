//! Browser-driven search against the IRCTC website.
//!
//! A real Chrome instance (via a WebDriver server such as chromedriver)
//! fills in the search form. The rendered results page is handed to
//! [`crate::normalize`] for extraction.
//!
//! Key characteristics:
//! - One browser session per search, always released
//! - Explicit waits poll the DOM; the welcome popup is optional
//! - The date is validated before any browser is started

mod error;
#[cfg(test)]
mod fake_driver;
mod form;
mod search;
mod session;
mod webdriver;

pub use error::{ScrapeError, WebDriverError};
pub use form::{IrctcConfig, IrctcScraper};
pub use search::{ScrapeQuery, ScrapedPage, TrainScraper, search_trains};
pub use session::{BrowserSession, Condition};
pub use webdriver::{ElementId, Locator, WebDriverClient, keys};

#[cfg(test)]
pub(crate) use search::fake;
