//! Rail API client error types.

use std::fmt;

use crate::domain::InvalidDateFormat;

/// Errors from the third-party rail API client.
#[derive(Debug)]
pub enum RailApiError {
    /// Request never completed (connect failure, timeout, reset)
    Network(reqwest::Error),

    /// Upstream answered with a non-success status
    UpstreamStatus { status: u16, message: String },

    /// Response body was not the expected JSON
    Json {
        message: String,
        body: Option<String>,
    },

    /// Journey date could not be parsed
    InvalidDate(InvalidDateFormat),

    /// A configured or supplied header value is not valid in HTTP
    InvalidHeader(&'static str),
}

impl fmt::Display for RailApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RailApiError::Network(e) => write!(f, "upstream unreachable: {e}"),
            RailApiError::UpstreamStatus { status, message } => {
                write!(f, "upstream error {status}: {message}")
            }
            RailApiError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            RailApiError::InvalidDate(e) => write!(f, "{e}"),
            RailApiError::InvalidHeader(name) => write!(f, "invalid {name} header value"),
        }
    }
}

impl std::error::Error for RailApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RailApiError::Network(e) => Some(e),
            RailApiError::InvalidDate(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RailApiError {
    fn from(err: reqwest::Error) -> Self {
        RailApiError::Network(err)
    }
}

impl From<InvalidDateFormat> for RailApiError {
    fn from(err: InvalidDateFormat) -> Self {
        RailApiError::InvalidDate(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JourneyDate;

    #[test]
    fn error_display() {
        let err = RailApiError::UpstreamStatus {
            status: 403,
            message: "Forbidden".into(),
        };
        assert_eq!(err.to_string(), "upstream error 403: Forbidden");

        let err = RailApiError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("<html>"));

        let err: RailApiError = JourneyDate::parse("soon").unwrap_err().into();
        assert_eq!(
            err.to_string(),
            "Date 'soon' not in dd/mm/YYYY or dd-mm-YYYY format"
        );

        let err = RailApiError::InvalidHeader("deviceid");
        assert_eq!(err.to_string(), "invalid deviceid header value");
    }
}
