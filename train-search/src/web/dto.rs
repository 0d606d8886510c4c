//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::TrainRecord;
use crate::normalize::{NO_TRAINS_MESSAGE, SearchResult};
use crate::railapi::ProxyTrain;

/// Body of `POST /search` on the browser backend.
#[derive(Debug, Default, Deserialize)]
pub struct ScrapeSearchBody {
    pub from_code: Option<String>,
    pub to_code: Option<String>,
    pub journey_date: Option<String>,
}

/// Query of `GET /search-get`.
#[derive(Debug, Default, Deserialize)]
pub struct ScrapeSearchQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
}

/// Query or body of `/search` on the API backend.
#[derive(Debug, Default, Deserialize)]
pub struct ProxySearchParams {
    pub src: Option<String>,
    pub dst: Option<String>,
    pub date: Option<String>,
    pub device_id: Option<String>,
}

/// A train in browser search results.
#[derive(Debug, Serialize)]
pub struct TrainResult {
    pub train_name: String,
    pub train_number: String,
    pub departure_time: String,
    pub arrival_time: String,

    /// Day and month, e.g. "27 May"
    pub departure_date: String,
    pub arrival_date: String,

    pub from_station_name: String,
    pub from_station_code: String,
    pub to_station_name: String,
    pub to_station_code: String,

    /// Short day names ("Mon".."Sun") in week order
    pub operating_days: Vec<String>,

    pub available_classes: Vec<String>,
}

/// Search envelope: trains with a message, or an error with no trains.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Trains {
        message: String,
        trains: Vec<TrainResult>,
    },
    Failed {
        error: String,
        trains: Vec<TrainResult>,
    },
}

impl SearchResponse {
    pub fn is_failure(&self) -> bool {
        matches!(self, SearchResponse::Failed { .. })
    }
}

/// Response of the API-backed search.
#[derive(Debug, Serialize)]
pub struct ProxySearchResponse {
    pub src: String,
    pub dst: String,
    pub date: String,
    pub message: String,
    pub train_count: usize,
    pub trains: Vec<ProxyTrain>,
}

impl ProxySearchResponse {
    pub fn new(src: String, dst: String, date: String, trains: Vec<ProxyTrain>) -> Self {
        let message = if trains.is_empty() {
            NO_TRAINS_MESSAGE.to_string()
        } else {
            format!("Found {} trains", trains.len())
        };
        Self {
            src,
            dst,
            date,
            message,
            train_count: trains.len(),
            trains,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,

    /// Local time, ISO-8601
    pub timestamp: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Example request, where one helps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<&'static str>,
}

// Conversion implementations

impl From<TrainRecord> for TrainResult {
    fn from(record: TrainRecord) -> Self {
        Self {
            train_name: record.train_name,
            train_number: record.train_number,
            departure_time: record.departure_time,
            arrival_time: record.arrival_time,
            departure_date: record.departure_date,
            arrival_date: record.arrival_date,
            from_station_name: record.origin.name,
            from_station_code: record.origin.code,
            to_station_name: record.destination.name,
            to_station_code: record.destination.code,
            operating_days: record
                .operating_days
                .iter()
                .map(|day| day.to_string())
                .collect(),
            available_classes: record.available_classes,
        }
    }
}

impl From<SearchResult> for SearchResponse {
    fn from(result: SearchResult) -> Self {
        match result {
            SearchResult::Trains { message, trains } => SearchResponse::Trains {
                message,
                trains: trains.into_iter().map(TrainResult::from).collect(),
            },
            SearchResult::Failed { error } => SearchResponse::Failed {
                error,
                trains: Vec::new(),
            },
        }
    }
}
