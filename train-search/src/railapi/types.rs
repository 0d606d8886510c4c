//! Rail API response DTOs.
//!
//! Only the fields this service forwards are modelled; everything else in
//! the payload is ignored. The envelope is typed, but each train is kept
//! as raw JSON until conversion, so one odd entry cannot sink the list.
//! Scalars are forwarded as whatever JSON the upstream sent.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Top-level response of the train search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainSearchResponse {
    #[serde(default)]
    pub data: Option<TrainSearchData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainSearchData {
    #[serde(default)]
    pub train_list: Option<Vec<Value>>,
}

/// One train in the upstream list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTrain {
    pub train_number: Option<Value>,
    pub train_name: Option<Value>,
    pub departure_time: Option<Value>,
    pub arrival_time: Option<Value>,
    pub distance: Option<Value>,

    /// Per-class booking status, keyed by class label (e.g. "SL", "3A").
    /// Entries are `{availability, ...}` objects when well formed.
    pub availability_cache: Option<Value>,
}

impl ApiTrain {
    /// Read one train entry. Only a non-object entry is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            warn!(entry = %value, "skipping train entry that is not an object");
            return None;
        }
        match serde_json::from_value(value) {
            Ok(train) => Some(train),
            Err(e) => {
                warn!(error = %e, "skipping unreadable train entry");
                None
            }
        }
    }
}

impl TrainSearchResponse {
    /// The trains, empty if the upstream left the list out.
    pub fn into_trains(self) -> Vec<ApiTrain> {
        self.data
            .and_then(|d| d.train_list)
            .unwrap_or_default()
            .into_iter()
            .filter_map(ApiTrain::from_value)
            .collect()
    }
}
