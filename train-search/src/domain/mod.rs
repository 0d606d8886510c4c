//! Domain types for train search.
//!
//! These types hold validated request inputs and the canonical shape of a
//! normalized train. Parsing happens at construction, so code receiving a
//! [`JourneyDate`] can trust it.

mod clock;
mod date;
mod station;
mod train;

pub use clock::{ClockError, ClockTime, arrives_next_day};
pub use date::{InvalidDateFormat, JourneyDate};
pub use station::StationRef;
pub(crate) use station::split_parenthesized;
pub use train::{NOT_AVAILABLE, TrainRecord, WEEK};
