//! W3C WebDriver command client.
//!
//! Speaks just enough of the WebDriver wire protocol to fill in and submit
//! a search form: sessions, navigation, element lookup and interaction,
//! script execution and page source. Every response is a JSON object with
//! a `value` member; failures carry `value.error` and `value.message`.

use reqwest::Method;
use serde_json::{Value, json};

use super::error::WebDriverError;

/// JSON key identifying a web element reference.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Special key code points from the WebDriver keyboard table.
pub mod keys {
    pub const TAB: &str = "\u{E004}";
    pub const ENTER: &str = "\u{E007}";
    pub const ARROW_DOWN: &str = "\u{E015}";
}

/// How to find an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    Css(&'static str),
    XPath(&'static str),
}

impl Locator {
    fn to_json(self) -> Value {
        match self {
            Locator::Css(value) => json!({ "using": "css selector", "value": value }),
            Locator::XPath(value) => json!({ "using": "xpath", "value": value }),
        }
    }

    /// The raw selector, for messages.
    pub fn selector(&self) -> &'static str {
        match self {
            Locator::Css(s) | Locator::XPath(s) => s,
        }
    }
}

/// Opaque reference to an element in the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementId(String);

impl ElementId {
    fn from_json(value: &Value) -> Result<Self, WebDriverError> {
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(|id| ElementId(id.to_string()))
            .ok_or_else(|| WebDriverError::Malformed(format!("not an element: {value}")))
    }

    /// The element as a script argument.
    pub fn to_json(&self) -> Value {
        json!({ ELEMENT_KEY: self.0 })
    }
}

/// Client for one WebDriver server (e.g. chromedriver).
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: reqwest::Client,
    base_url: String,
}

impl WebDriverClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, WebDriverError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Open a new session, returning its id.
    pub async fn new_session(&self, capabilities: Value) -> Result<String, WebDriverError> {
        let value = self
            .send(
                Method::POST,
                "session".to_string(),
                Some(json!({ "capabilities": { "alwaysMatch": capabilities } })),
            )
            .await?;

        value
            .get("sessionId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| WebDriverError::Malformed("missing sessionId".to_string()))
    }

    /// End a session and close its browser.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), WebDriverError> {
        self.send(Method::DELETE, format!("session/{session_id}"), None)
            .await
            .map(drop)
    }

    pub async fn navigate(&self, session_id: &str, url: &str) -> Result<(), WebDriverError> {
        self.send(
            Method::POST,
            format!("session/{session_id}/url"),
            Some(json!({ "url": url })),
        )
        .await
        .map(drop)
    }

    /// Find the first element matching `locator`, if any.
    pub async fn find(
        &self,
        session_id: &str,
        locator: Locator,
    ) -> Result<Option<ElementId>, WebDriverError> {
        match self
            .send(
                Method::POST,
                format!("session/{session_id}/element"),
                Some(locator.to_json()),
            )
            .await
        {
            Ok(value) => ElementId::from_json(&value).map(Some),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Find all elements matching `locator`.
    pub async fn find_all(
        &self,
        session_id: &str,
        locator: Locator,
    ) -> Result<Vec<ElementId>, WebDriverError> {
        let value = self
            .send(
                Method::POST,
                format!("session/{session_id}/elements"),
                Some(locator.to_json()),
            )
            .await?;

        value
            .as_array()
            .ok_or_else(|| WebDriverError::Malformed(format!("expected array: {value}")))?
            .iter()
            .map(ElementId::from_json)
            .collect()
    }

    pub async fn click(&self, session_id: &str, element: &ElementId) -> Result<(), WebDriverError> {
        self.element_command(session_id, element, "click", json!({}))
            .await
    }

    pub async fn clear(&self, session_id: &str, element: &ElementId) -> Result<(), WebDriverError> {
        self.element_command(session_id, element, "clear", json!({}))
            .await
    }

    pub async fn send_keys(
        &self,
        session_id: &str,
        element: &ElementId,
        text: &str,
    ) -> Result<(), WebDriverError> {
        self.element_command(session_id, element, "value", json!({ "text": text }))
            .await
    }

    /// Read a DOM property (e.g. an input's `value`).
    pub async fn property(
        &self,
        session_id: &str,
        element: &ElementId,
        name: &str,
    ) -> Result<Option<String>, WebDriverError> {
        let value = self
            .send(
                Method::GET,
                format!("session/{session_id}/element/{}/property/{name}", element.0),
                None,
            )
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    /// Whether the element is both displayed and enabled.
    pub async fn is_interactable(
        &self,
        session_id: &str,
        element: &ElementId,
    ) -> Result<bool, WebDriverError> {
        for state in ["displayed", "enabled"] {
            let value = self
                .send(
                    Method::GET,
                    format!("session/{session_id}/element/{}/{state}", element.0),
                    None,
                )
                .await?;
            if value.as_bool() != Some(true) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Run a synchronous script in the page.
    pub async fn execute(
        &self,
        session_id: &str,
        script: &str,
        args: Vec<Value>,
    ) -> Result<Value, WebDriverError> {
        self.send(
            Method::POST,
            format!("session/{session_id}/execute/sync"),
            Some(json!({ "script": script, "args": args })),
        )
        .await
    }

    /// Serialized DOM of the current page.
    pub async fn page_source(&self, session_id: &str) -> Result<String, WebDriverError> {
        let value = self
            .send(Method::GET, format!("session/{session_id}/source"), None)
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WebDriverError::Malformed("page source is not a string".to_string()))
    }

    async fn element_command(
        &self,
        session_id: &str,
        element: &ElementId,
        command: &str,
        body: Value,
    ) -> Result<(), WebDriverError> {
        self.send(
            Method::POST,
            format!("session/{session_id}/element/{}/{command}", element.0),
            Some(body),
        )
        .await
        .map(drop)
    }

    /// Send a command and unwrap the `value` member of the response.
    async fn send(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> Result<Value, WebDriverError> {
        let url = format!("{}/{}", self.base_url, path);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let mut parsed: Value = serde_json::from_str(&body).map_err(|e| {
            WebDriverError::Malformed(format!(
                "{e} (status {status}, body: {})",
                body.chars().take(200).collect::<String>()
            ))
        })?;
        let value = parsed
            .get_mut("value")
            .map(Value::take)
            .unwrap_or(Value::Null);

        if !status.is_success() {
            let field = |name: &str| {
                value
                    .get(name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            return Err(WebDriverError::Command {
                error: field("error"),
                message: field("message"),
            });
        }

        Ok(value)
    }
}
