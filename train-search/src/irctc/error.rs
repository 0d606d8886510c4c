//! Browser automation error types.

use std::time::Duration;

/// Errors from the WebDriver command client.
#[derive(Debug, thiserror::Error)]
pub enum WebDriverError {
    /// Transport failure talking to the WebDriver server
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The WebDriver server rejected a command
    #[error("WebDriver error {error}: {message}")]
    Command { error: String, message: String },

    /// The response did not have the expected shape
    #[error("unexpected WebDriver response: {0}")]
    Malformed(String),
}

impl WebDriverError {
    /// WebDriver error code for a locator that matched nothing.
    pub const NO_SUCH_ELEMENT: &'static str = "no such element";

    pub fn is_no_such_element(&self) -> bool {
        matches!(self, WebDriverError::Command { error, .. } if error == Self::NO_SUCH_ELEMENT)
    }
}

/// Errors while driving the search form.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Could not open a browser session
    #[error("failed to start browser session: {0}")]
    SessionStart(#[source] WebDriverError),

    /// An element did not reach the expected state in time
    #[error("timed out after {}s waiting for {what}", timeout.as_secs())]
    Timeout { what: String, timeout: Duration },

    /// Any other WebDriver failure mid-search
    #[error(transparent)]
    WebDriver(#[from] WebDriverError),
}
