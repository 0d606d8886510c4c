//! Rail API HTTP client.
//!
//! One outbound request per search, bounded by the configured timeout and
//! never retried.

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::domain::JourneyDate;

use super::convert::{ProxyTrain, convert_trains};
use super::error::RailApiError;
use super::headers::HeaderProfile;
use super::types::TrainSearchResponse;

/// Default base URL for the rail API.
const DEFAULT_BASE_URL: &str = "https://cttrainsapi.confirmtkt.com";

/// Public key the upstream's own web client sends.
const DEFAULT_API_KEY: &str = "ct-web!2$";

/// Device id sent when the caller does not supply one.
const DEFAULT_DEVICE_ID: &str = "5d4c1e2f-7a3b-4e8d-9c6f-0a1b2c3d4e5f";

/// Train search path, relative to the base URL.
const SEARCH_PATH: &str = "api/v1/trains/search";

/// Configuration for the rail API client.
#[derive(Debug, Clone)]
pub struct RailApiConfig {
    /// Value of the `apikey` header
    pub api_key: String,
    /// Default value of the `deviceid` header
    pub device_id: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RailApiConfig {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            device_id: DEFAULT_DEVICE_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

impl RailApiConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Set the default device id.
    pub fn with_device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = id.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// A train search against the rail API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RailApiQuery<'a> {
    pub src: &'a str,
    pub dst: &'a str,
    pub date: &'a str,
    /// Overrides the configured device id for this request.
    pub device_id: Option<&'a str>,
}

/// Client for the third-party rail API.
#[derive(Debug, Clone)]
pub struct RailApiClient {
    http: reqwest::Client,
    base_url: String,
    device_id: HeaderValue,
}

impl RailApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RailApiConfig) -> Result<Self, RailApiError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| RailApiError::InvalidHeader("apikey"))?;
        headers.insert(HeaderName::from_static("apikey"), api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let device_id = HeaderValue::from_str(&config.device_id)
            .map_err(|_| RailApiError::InvalidHeader("deviceid"))?;

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            device_id,
        })
    }

    /// Search trains between two stations on a date.
    pub async fn search(&self, query: &RailApiQuery<'_>) -> Result<Vec<ProxyTrain>, RailApiError> {
        let date = JourneyDate::parse(query.date)?;

        let device_id = match query.device_id {
            Some(id) => {
                HeaderValue::from_str(id).map_err(|_| RailApiError::InvalidHeader("deviceid"))?
            }
            None => self.device_id.clone(),
        };

        let profile = HeaderProfile::random();
        let url = format!("{}/{}", self.base_url, SEARCH_PATH);
        debug!(
            %url,
            src = query.src,
            dst = query.dst,
            user_agent = profile.user_agent,
            "querying rail API"
        );

        let response = self
            .http
            .get(&url)
            .headers(profile.to_headers())
            .header(HeaderName::from_static("deviceid"), device_id)
            .query(&[
                ("sourceStationCode", query.src),
                ("destinationStationCode", query.dst),
                ("dateOfJourney", date.to_dashed().as_str()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RailApiError::UpstreamStatus {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;

        let parsed: TrainSearchResponse =
            serde_json::from_str(&body).map_err(|e| RailApiError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(convert_trains(parsed.into_trains()))
    }
}
