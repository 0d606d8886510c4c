//! Reshaping upstream trains into the response shape.
//!
//! Scalar fields pass through unchanged. Only the availability cache is
//! flattened, from `class -> {availability, ...}` to `class -> status`.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::domain::NOT_AVAILABLE;

use super::types::ApiTrain;

/// One train as returned by the API-backed search.
///
/// This source carries no operating days or arrival date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProxyTrain {
    pub train_number: Option<Value>,
    pub train_name: Option<Value>,
    pub departure_time: Option<Value>,
    pub arrival_time: Option<Value>,
    pub distance: Option<Value>,
    pub availability: BTreeMap<String, String>,
}

impl From<ApiTrain> for ProxyTrain {
    fn from(train: ApiTrain) -> Self {
        Self {
            train_number: train.train_number,
            train_name: train.train_name,
            departure_time: train.departure_time,
            arrival_time: train.arrival_time,
            distance: train.distance,
            availability: flatten_availability(train.availability_cache.as_ref()),
        }
    }
}

/// `class -> status`; classes without a readable status get the sentinel.
fn flatten_availability(cache: Option<&Value>) -> BTreeMap<String, String> {
    let Some(classes) = cache.and_then(Value::as_object) else {
        return BTreeMap::new();
    };

    classes
        .iter()
        .map(|(class, entry)| {
            let status = entry
                .get("availability")
                .and_then(Value::as_str)
                .unwrap_or(NOT_AVAILABLE);
            (class.clone(), status.to_string())
        })
        .collect()
}

/// Convert every upstream train, preserving order.
pub fn convert_trains(trains: Vec<ApiTrain>) -> Vec<ProxyTrain> {
    trains.into_iter().map(ProxyTrain::from).collect()
}
