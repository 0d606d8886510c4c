//! Scoped browser sessions.
//!
//! A session owns a live browser process on the WebDriver server. It must
//! be released on every exit path: callers pair [`BrowserSession::start`]
//! with [`BrowserSession::release`], and [`Drop`] covers the case where
//! the owning future is cancelled in between.

use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::error::{ScrapeError, WebDriverError};
use super::webdriver::{ElementId, Locator, WebDriverClient};

/// Delay between polls while waiting for an element.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// What an explicit wait is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The element exists in the DOM
    Present,
    /// The element exists and is displayed and enabled
    Clickable,
}

/// A live WebDriver session.
#[derive(Debug)]
pub struct BrowserSession {
    client: WebDriverClient,
    id: String,
    released: bool,
}

impl BrowserSession {
    /// Open a session on the WebDriver server.
    pub async fn start(
        client: &WebDriverClient,
        capabilities: Value,
    ) -> Result<Self, ScrapeError> {
        let id = client
            .new_session(capabilities)
            .await
            .map_err(ScrapeError::SessionStart)?;
        debug!(session = %id, "browser session started");
        Ok(Self {
            client: client.clone(),
            id,
            released: false,
        })
    }

    /// Close the browser. Failures are logged, never returned.
    pub async fn release(mut self) {
        self.released = true;
        match self.client.delete_session(&self.id).await {
            Ok(()) => debug!(session = %self.id, "browser session released"),
            Err(e) => warn!(session = %self.id, error = %e, "failed to release browser session"),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn goto(&self, url: &str) -> Result<(), WebDriverError> {
        self.client.navigate(&self.id, url).await
    }

    pub async fn find_all(&self, locator: Locator) -> Result<Vec<ElementId>, WebDriverError> {
        self.client.find_all(&self.id, locator).await
    }

    pub async fn click(&self, element: &ElementId) -> Result<(), WebDriverError> {
        self.client.click(&self.id, element).await
    }

    pub async fn clear(&self, element: &ElementId) -> Result<(), WebDriverError> {
        self.client.clear(&self.id, element).await
    }

    pub async fn send_keys(&self, element: &ElementId, text: &str) -> Result<(), WebDriverError> {
        self.client.send_keys(&self.id, element, text).await
    }

    /// Current `value` of an input, trimmed. Empty if unset.
    pub async fn input_value(&self, element: &ElementId) -> Result<String, WebDriverError> {
        Ok(self
            .client
            .property(&self.id, element, "value")
            .await?
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, WebDriverError> {
        self.client.execute(&self.id, script, args).await
    }

    pub async fn page_source(&self) -> Result<String, WebDriverError> {
        self.client.page_source(&self.id).await
    }

    /// Wait until `locator` meets `condition`, returning the element.
    pub async fn wait_for(
        &self,
        locator: Locator,
        condition: Condition,
        timeout: Duration,
    ) -> Result<ElementId, ScrapeError> {
        poll_until(locator.selector(), timeout, move || async move {
            let Some(element) = self.client.find(&self.id, locator).await? else {
                return Ok(None);
            };
            let ready = match condition {
                Condition::Present => true,
                Condition::Clickable => self.client.is_interactable(&self.id, &element).await?,
            };
            Ok::<_, WebDriverError>(ready.then_some(element))
        })
        .await
    }

    /// Like [`wait_for`](Self::wait_for), but a timeout means "absent".
    pub async fn wait_for_optional(
        &self,
        locator: Locator,
        condition: Condition,
        timeout: Duration,
    ) -> Result<Option<ElementId>, ScrapeError> {
        match self.wait_for(locator, condition, timeout).await {
            Ok(element) => Ok(Some(element)),
            Err(ScrapeError::Timeout { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Wait until any of `locators` matches at least one element.
    pub async fn wait_for_any(
        &self,
        locators: &[Locator],
        timeout: Duration,
    ) -> Result<(), ScrapeError> {
        let what = locators
            .iter()
            .map(Locator::selector)
            .collect::<Vec<_>>()
            .join(" or ");

        poll_until(&what, timeout, move || async move {
            for &locator in locators {
                if !self.client.find_all(&self.id, locator).await?.is_empty() {
                    return Ok(Some(()));
                }
            }
            Ok::<_, WebDriverError>(None)
        })
        .await
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        // Cancelled before release: close the browser in the background.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(session = %self.id, "browser session leaked: no runtime to release it");
            return;
        };
        let client = self.client.clone();
        let id = std::mem::take(&mut self.id);
        handle.spawn(async move {
            if let Err(e) = client.delete_session(&id).await {
                warn!(session = %id, error = %e, "failed to release abandoned browser session");
            }
        });
    }
}

/// Call `check` until it yields a value or `timeout` elapses.
async fn poll_until<T, F, Fut>(
    what: &str,
    timeout: Duration,
    mut check: F,
) -> Result<T, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, WebDriverError>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(found) = check().await? {
            return Ok(found);
        }
        if Instant::now() >= deadline {
            return Err(ScrapeError::Timeout {
                what: what.to_string(),
                timeout,
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irctc::fake_driver::{FakeDriver, SESSION_ID};

    #[tokio::test(start_paused = true)]
    async fn poll_returns_first_hit() {
        let mut calls = 0;
        let found = poll_until("thing", Duration::from_secs(5), || {
            calls += 1;
            let seen = calls;
            async move { Ok::<_, WebDriverError>((seen == 3).then_some(seen)) }
        })
        .await
        .unwrap();
        assert_eq!(found, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_times_out() {
        let result: Result<(), _> = poll_until("button.ok", Duration::from_secs(1), || async {
            Ok::<_, WebDriverError>(None)
        })
        .await;
        match result {
            Err(ScrapeError::Timeout { what, timeout }) => {
                assert_eq!(what, "button.ok");
                assert_eq!(timeout, Duration::from_secs(1));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn poll_propagates_driver_errors() {
        let result: Result<(), _> = poll_until("x", Duration::from_secs(1), || async {
            Err::<Option<()>, _>(WebDriverError::Malformed("bad".into()))
        })
        .await;
        assert!(matches!(result, Err(ScrapeError::WebDriver(_))));
    }

    #[tokio::test]
    async fn unreachable_server_fails_to_start() {
        // Port 9 (discard) is not a WebDriver server.
        let client = WebDriverClient::new("http://127.0.0.1:9").unwrap();
        let result = BrowserSession::start(&client, serde_json::json!({})).await;
        assert!(matches!(result, Err(ScrapeError::SessionStart(_))));
    }

    #[tokio::test]
    async fn release_deletes_once() {
        let (driver, url) = FakeDriver::start().await;
        let client = WebDriverClient::new(url).unwrap();

        let session = BrowserSession::start(&client, serde_json::json!({})).await.unwrap();
        assert_eq!(session.id(), SESSION_ID);
        session.release().await;
        assert_eq!(driver.deleted(), vec![SESSION_ID.to_string()]);

        // Drop after release must not delete again.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(driver.deleted().len(), 1);
    }

    #[tokio::test]
    async fn dropped_session_is_deleted_in_background() {
        let (driver, url) = FakeDriver::start().await;
        let client = WebDriverClient::new(url).unwrap();

        let session = BrowserSession::start(&client, serde_json::json!({})).await.unwrap();
        drop(session);

        tokio::time::timeout(Duration::from_secs(5), async {
            while driver.deleted().is_empty() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("abandoned session was never deleted");
        assert_eq!(driver.deleted(), vec![SESSION_ID.to_string()]);
    }
}
