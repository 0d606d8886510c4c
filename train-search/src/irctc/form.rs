//! Search form driver for the IRCTC train search page.
//!
//! The page is an Angular app. Station fields are PrimeNG autocompletes
//! that only accept a value after the suggestion list has rendered, and
//! the date field needs both typed keystrokes and a scripted `input`
//! event before the form picks it up.

use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::StationRef;
use crate::normalize::{NO_TRAINS_XPATH, TRAIN_BLOCK_CSS};

use super::error::{ScrapeError, WebDriverError};
use super::search::{ScrapeQuery, ScrapedPage, TrainScraper};
use super::session::{BrowserSession, Condition};
use super::webdriver::{ElementId, Locator, WebDriverClient, keys};

/// Default WebDriver endpoint (a local chromedriver).
const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Default search page.
const DEFAULT_SEARCH_URL: &str = "https://www.irctc.co.in/nget/train-search";

/// Desktop Chrome user agent presented by the headless browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const POPUP_OK: Locator = Locator::XPath("//button[text()='OK']");
const ORIGIN_INPUT: Locator =
    Locator::Css("p-autocomplete[formcontrolname='origin'] input.ui-autocomplete-input");
const DESTINATION_INPUT: Locator =
    Locator::Css("p-autocomplete[formcontrolname='destination'] input.ui-autocomplete-input");
const SUGGESTIONS: Locator = Locator::Css(".ui-autocomplete-items");
const DATE_INPUT: Locator = Locator::Css("span.ui-calendar > input.ui-inputtext");
const SEARCH_BUTTON: Locator = Locator::Css("button.search_btn.train_Search");
const TRAIN_BLOCKS: Locator = Locator::Css(TRAIN_BLOCK_CSS);
const NO_TRAINS: Locator = Locator::XPath(NO_TRAINS_XPATH);

/// Sets an input's value and fires the events Angular listens for.
const SET_INPUT_SCRIPT: &str = "arguments[0].value = arguments[1];\
    arguments[0].dispatchEvent(new Event('input',{bubbles:true}));\
    arguments[0].dispatchEvent(new Event('change',{bubbles:true}));";

/// Configuration for the search form driver.
#[derive(Debug, Clone)]
pub struct IrctcConfig {
    /// WebDriver server URL
    pub webdriver_url: String,
    /// Search page URL
    pub search_url: String,
    /// Wait for form elements and results
    pub wait: Duration,
    /// Wait for optional elements (the welcome popup) and the first field
    pub short_wait: Duration,
    /// Run Chrome without a window
    pub headless: bool,
}

impl Default for IrctcConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            wait: Duration::from_secs(20),
            short_wait: Duration::from_secs(10),
            headless: true,
        }
    }
}

impl IrctcConfig {
    /// Set the WebDriver server URL.
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    /// Set a custom search page URL (for testing).
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    /// Set the long and short explicit waits.
    pub fn with_waits(mut self, wait: Duration, short_wait: Duration) -> Self {
        self.wait = wait;
        self.short_wait = short_wait;
        self
    }

    /// Chrome capabilities for a new session.
    pub fn capabilities(&self) -> Value {
        let mut args = vec![
            "--disable-notifications".to_string(),
            "--disable-gpu".to_string(),
            "--window-size=1920,1080".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-web-security".to_string(),
            "--disable-features=VizDisplayCompositor".to_string(),
            format!("--user-agent={USER_AGENT}"),
            "--blink-settings=imagesEnabled=false".to_string(),
            "--disable-extensions".to_string(),
        ];
        if self.headless {
            args.insert(0, "--headless".to_string());
        }

        json!({
            "browserName": "chrome",
            "pageLoadStrategy": "eager",
            "goog:chromeOptions": { "args": args },
        })
    }
}

/// Scrapes search results by driving a real browser.
///
/// Each search gets its own browser session, closed before returning.
#[derive(Debug, Clone)]
pub struct IrctcScraper {
    driver: WebDriverClient,
    config: IrctcConfig,
}

impl IrctcScraper {
    pub fn new(config: IrctcConfig) -> Result<Self, WebDriverError> {
        Ok(Self {
            driver: WebDriverClient::new(&config.webdriver_url)?,
            config,
        })
    }

    async fn run(&self, query: &ScrapeQuery) -> Result<ScrapedPage, ScrapeError> {
        let session = BrowserSession::start(&self.driver, self.config.capabilities()).await?;
        let outcome = self.fill_and_submit(&session, query).await;
        session.release().await;
        outcome
    }

    async fn fill_and_submit(
        &self,
        session: &BrowserSession,
        query: &ScrapeQuery,
    ) -> Result<ScrapedPage, ScrapeError> {
        let wait = self.config.wait;
        let short_wait = self.config.short_wait;

        session.goto(&self.config.search_url).await?;

        if let Some(ok) = session
            .wait_for_optional(POPUP_OK, Condition::Clickable, short_wait)
            .await?
        {
            debug!("dismissing welcome popup");
            session.click(&ok).await?;
        }

        let origin_field = session
            .wait_for(ORIGIN_INPUT, Condition::Clickable, short_wait)
            .await?;
        let origin = self
            .pick_station(session, &origin_field, &query.from_code, &[keys::ENTER])
            .await?;

        let destination_field = session
            .wait_for(DESTINATION_INPUT, Condition::Clickable, wait)
            .await?;
        let destination = self
            .pick_station(
                session,
                &destination_field,
                &query.to_code,
                &[keys::ARROW_DOWN, keys::ENTER],
            )
            .await?;
        debug!(?origin, ?destination, "stations resolved");

        let date_field = session
            .wait_for(DATE_INPUT, Condition::Clickable, wait)
            .await?;
        self.enter_date(session, &date_field, &query.journey_date.to_string())
            .await?;

        let search = session
            .wait_for(SEARCH_BUTTON, Condition::Clickable, wait)
            .await?;
        session.click(&search).await?;
        pause(1000).await;

        session.wait_for_any(&[TRAIN_BLOCKS, NO_TRAINS], wait).await?;

        Ok(ScrapedPage {
            origin,
            destination,
            html: session.page_source().await?,
        })
    }

    /// Type a station code, accept a suggestion, and read back what the
    /// field resolved to.
    async fn pick_station(
        &self,
        session: &BrowserSession,
        field: &ElementId,
        code: &str,
        accept: &[&str],
    ) -> Result<StationRef, ScrapeError> {
        session.clear(field).await?;
        session.send_keys(field, code).await?;
        session
            .wait_for(SUGGESTIONS, Condition::Present, self.config.wait)
            .await?;
        session.send_keys(field, &accept.concat()).await?;

        let resolved = session.input_value(field).await?;
        Ok(StationRef::parse(&resolved, code))
    }

    async fn enter_date(
        &self,
        session: &BrowserSession,
        field: &ElementId,
        date: &str,
    ) -> Result<(), ScrapeError> {
        session.click(field).await?;
        pause(200).await;
        session.clear(field).await?;
        pause(200).await;

        for c in date.chars() {
            session.send_keys(field, c.encode_utf8(&mut [0; 4])).await?;
            pause(50).await;
        }
        session.send_keys(field, keys::TAB).await?;

        // Typed input is sometimes dropped by the datepicker.
        session
            .execute(SET_INPUT_SCRIPT, vec![field.to_json(), json!(date)])
            .await?;
        pause(500).await;
        Ok(())
    }
}

impl TrainScraper for IrctcScraper {
    fn scrape<'a>(
        &'a self,
        query: &'a ScrapeQuery,
    ) -> BoxFuture<'a, Result<ScrapedPage, ScrapeError>> {
        Box::pin(self.run(query))
    }
}

async fn pause(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irctc::fake_driver::{FakeDriver, SESSION_ID};

    #[test]
    fn config_defaults() {
        let config = IrctcConfig::default();
        assert_eq!(config.webdriver_url, DEFAULT_WEBDRIVER_URL);
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(config.wait, Duration::from_secs(20));
        assert_eq!(config.short_wait, Duration::from_secs(10));
        assert!(config.headless);
    }

    #[test]
    fn config_builder() {
        let config = IrctcConfig::default()
            .with_webdriver_url("http://chromedriver:4444")
            .with_search_url("http://localhost:8000/search")
            .with_waits(Duration::from_secs(5), Duration::from_secs(2));

        assert_eq!(config.webdriver_url, "http://chromedriver:4444");
        assert_eq!(config.search_url, "http://localhost:8000/search");
        assert_eq!(config.wait, Duration::from_secs(5));
        assert_eq!(config.short_wait, Duration::from_secs(2));
    }

    #[test]
    fn capabilities() {
        let caps = IrctcConfig::default().capabilities();
        assert_eq!(caps["browserName"], "chrome");
        assert_eq!(caps["pageLoadStrategy"], "eager");

        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert_eq!(args[0], "--headless");
        assert!(args.iter().any(|a| a == "--blink-settings=imagesEnabled=false"));
        assert!(
            args.iter()
                .any(|a| a.as_str().is_some_and(|s| s.starts_with("--user-agent=")))
        );
    }

    #[test]
    fn headed_capabilities() {
        let config = IrctcConfig {
            headless: false,
            ..IrctcConfig::default()
        };
        let caps = config.capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless"));
    }

    #[tokio::test]
    async fn unreachable_driver_is_a_scrape_error() {
        let scraper =
            IrctcScraper::new(IrctcConfig::default().with_webdriver_url("http://127.0.0.1:9"))
                .unwrap();
        let query = ScrapeQuery {
            from_code: "DEOS".into(),
            to_code: "LJN".into(),
            journey_date: crate::domain::JourneyDate::parse("27/05/2025").unwrap(),
        };
        let result = scraper.scrape(&query).await;
        assert!(matches!(result, Err(ScrapeError::SessionStart(_))));
    }

    #[tokio::test]
    async fn session_released_when_search_fails() {
        let (driver, url) = FakeDriver::start().await;
        let scraper = IrctcScraper::new(IrctcConfig::default().with_webdriver_url(url)).unwrap();
        let query = ScrapeQuery {
            from_code: "DEOS".into(),
            to_code: "LJN".into(),
            journey_date: crate::domain::JourneyDate::parse("27/05/2025").unwrap(),
        };

        let result = scraper.scrape(&query).await;

        match result {
            Err(ScrapeError::WebDriver(WebDriverError::Command { message, .. })) => {
                assert_eq!(message, "net::ERR_NAME_NOT_RESOLVED");
            }
            other => panic!("expected navigation failure, got {other:?}"),
        }
        assert_eq!(driver.deleted(), vec![SESSION_ID.to_string()]);
    }
}
