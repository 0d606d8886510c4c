//! Server configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::irctc::IrctcConfig;
use crate::railapi::RailApiConfig;

/// Default listening port.
const DEFAULT_PORT: u16 = 5000;

/// Error returned when an environment variable holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    var: &'static str,
    value: String,
    reason: String,
}

/// Which upstream serves `/search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Drive a real browser against the ticketing site
    #[default]
    Scrape,
    /// Call the third-party JSON API
    Api,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scrape" | "browser" => Ok(Backend::Scrape),
            "api" | "proxy" => Ok(Backend::Api),
            other => Err(format!("unknown backend {other:?} (expected scrape or api)")),
        }
    }
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub backend: Backend,
    pub irctc: IrctcConfig,
    pub rail_api: RailApiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            backend: Backend::default(),
            irctc: IrctcConfig::default(),
            rail_api: RailApiConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`; unset variables keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            config.host = parse("HOST", &host)?;
        }
        if let Some(port) = get("PORT") {
            config.port = parse("PORT", &port)?;
        }
        if let Some(backend) = get("TRAIN_SEARCH_BACKEND") {
            config.backend = parse("TRAIN_SEARCH_BACKEND", &backend)?;
        }

        if let Some(url) = get("WEBDRIVER_URL") {
            config.irctc = config.irctc.with_webdriver_url(url);
        }
        if let Some(url) = get("IRCTC_SEARCH_URL") {
            config.irctc = config.irctc.with_search_url(url);
        }
        let wait = match get("BROWSER_WAIT_SECS") {
            Some(secs) => Duration::from_secs(parse("BROWSER_WAIT_SECS", &secs)?),
            None => config.irctc.wait,
        };
        let short_wait = match get("BROWSER_SHORT_WAIT_SECS") {
            Some(secs) => Duration::from_secs(parse("BROWSER_SHORT_WAIT_SECS", &secs)?),
            None => config.irctc.short_wait,
        };
        config.irctc = config.irctc.with_waits(wait, short_wait);

        if let Some(url) = get("RAIL_API_BASE_URL") {
            config.rail_api = config.rail_api.with_base_url(url);
        }
        if let Some(key) = get("RAIL_API_KEY") {
            config.rail_api = config.rail_api.with_api_key(key);
        }
        if let Some(id) = get("RAIL_API_DEVICE_ID") {
            config.rail_api = config.rail_api.with_device_id(id);
        }
        if let Some(secs) = get("RAIL_API_TIMEOUT_SECS") {
            config.rail_api = config
                .rail_api
                .with_timeout(parse("RAIL_API_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }

    /// Address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
