//! Canonical train record produced by the results-page extractor.

use chrono::Weekday;

use super::StationRef;

/// Placeholder for a scalar field that could not be extracted.
pub const NOT_AVAILABLE: &str = "N/A";

/// Weekday indicator cells appear in this order on the results page.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// One train from a search, normalized from a rendered train block.
///
/// Every field is best-effort. A field that could not be read holds
/// [`NOT_AVAILABLE`] or an empty sequence instead of failing the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainRecord {
    pub train_name: String,
    pub train_number: String,
    pub departure_time: String,
    pub arrival_time: String,
    /// `DD Mon` as shown upstream, or the requested date if absent.
    pub departure_date: String,
    /// `DD Mon`, inferred from departure/arrival clock times.
    pub arrival_date: String,
    pub origin: StationRef,
    pub destination: StationRef,
    /// Subset of [`WEEK`], in week order.
    pub operating_days: Vec<Weekday>,
    /// Class labels in document order.
    pub available_classes: Vec<String>,
}
