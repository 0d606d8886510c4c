//! Search result envelope.

use crate::domain::TrainRecord;

/// Message returned when the upstream reports no trains.
pub const NO_TRAINS_MESSAGE: &str = "No trains available";

/// Outcome of one search: either a list of trains (possibly empty) or an
/// error. There is no partial-success shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    Trains {
        message: String,
        trains: Vec<TrainRecord>,
    },
    Failed {
        error: String,
    },
}

impl SearchResult {
    /// The upstream explicitly reported that no trains run.
    pub fn no_trains() -> Self {
        SearchResult::Trains {
            message: NO_TRAINS_MESSAGE.to_string(),
            trains: Vec::new(),
        }
    }

    /// Wrap extracted trains with a `"Found N trains"` message.
    pub fn found(trains: Vec<TrainRecord>) -> Self {
        SearchResult::Trains {
            message: format!("Found {} trains", trains.len()),
            trains,
        }
    }

    /// The search failed somewhere in the fetch/extract pipeline.
    pub fn failed(error: impl Into<String>) -> Self {
        SearchResult::Failed {
            error: error.into(),
        }
    }

    /// The error message, if this result is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            SearchResult::Failed { error } => Some(error),
            SearchResult::Trains { .. } => None,
        }
    }

    /// Trains in the result; always empty for failures.
    pub fn trains(&self) -> &[TrainRecord] {
        match self {
            SearchResult::Trains { trains, .. } => trains,
            SearchResult::Failed { .. } => &[],
        }
    }
}
