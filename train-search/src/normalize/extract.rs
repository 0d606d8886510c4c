//! Per-field extraction of a train record.
//!
//! Each field is read on its own and falls back to a placeholder on
//! failure, so one missing element never costs the rest of the record.

use std::sync::LazyLock;

use chrono::Weekday;
use regex::Regex;
use tracing::warn;

use crate::domain::{
    ClockTime, JourneyDate, NOT_AVAILABLE, StationRef, TrainRecord, WEEK, arrives_next_day,
    split_parenthesized,
};

use super::block::TrainBlock;
use super::error::ExtractionError;

/// `"| Tue, 27 May"` inside the schedule annotation.
static DEPARTURE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    // Literal pattern; cannot fail.
    Regex::new(r"\|\s*(\w+,\s*\d+\s*\w+)").expect("static pattern must compile")
});

/// Marker text of an operating-day cell.
const RUNS_MARKER: &str = "Y";

/// Request-level values shared by every block on a results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub journey_date: JourneyDate,
    pub origin: StationRef,
    pub destination: StationRef,
}

/// Build a record from one train block.
pub fn extract_train<B: TrainBlock + ?Sized>(block: &B, ctx: &PageContext) -> TrainRecord {
    let (train_name, train_number) = or_placeholder("heading", name_and_number(block), || {
        (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string())
    });

    let (departure_time, arrival_time) = or_placeholder("times", times(block), || {
        (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string())
    });

    let departure_date = or_placeholder("departure date", departure_date(block), || {
        ctx.journey_date.to_string()
    });

    let arrival_date = or_placeholder(
        "arrival date",
        arrival_date(&departure_time, &arrival_time, ctx.journey_date),
        || departure_date.clone(),
    );

    let operating_days = or_placeholder("operating days", operating_days(block), Vec::new);
    let available_classes = or_placeholder("classes", available_classes(block), Vec::new);

    TrainRecord {
        train_name,
        train_number,
        departure_time,
        arrival_time,
        departure_date,
        arrival_date,
        origin: ctx.origin.clone(),
        destination: ctx.destination.clone(),
        operating_days,
        available_classes,
    }
}

fn or_placeholder<T>(
    field: &'static str,
    result: Result<T, ExtractionError>,
    placeholder: impl FnOnce() -> T,
) -> T {
    result.unwrap_or_else(|e| {
        warn!(field, error = %e, "field not extracted, using placeholder");
        placeholder()
    })
}

fn name_and_number<B: TrainBlock + ?Sized>(
    block: &B,
) -> Result<(String, String), ExtractionError> {
    let heading = block.heading()?;
    let (name, number) = split_parenthesized(&heading);
    Ok((name.to_string(), number.unwrap_or_default().to_string()))
}

fn times<B: TrainBlock + ?Sized>(block: &B) -> Result<(String, String), ExtractionError> {
    let times = block.times()?;
    let clean = |idx: usize| {
        times
            .get(idx)
            .map(|t| t.replace('|', "").trim().to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    Ok((clean(0), clean(1)))
}

fn departure_date<B: TrainBlock + ?Sized>(block: &B) -> Result<String, ExtractionError> {
    let annotation = block.date_annotation()?;
    let unexpected = || ExtractionError::Unexpected {
        field: "date annotation",
        text: annotation.clone(),
    };

    let captured = DEPARTURE_DATE
        .captures(&annotation)
        .and_then(|c| c.get(1))
        .ok_or_else(unexpected)?;

    // "Tue, 27 May" -> "27 May"
    let (_, day_month) = captured.as_str().split_once(',').ok_or_else(unexpected)?;
    Ok(day_month.trim().to_string())
}

fn arrival_date(
    departure_time: &str,
    arrival_time: &str,
    journey_date: JourneyDate,
) -> Result<String, ExtractionError> {
    let clock = |field: &'static str, text: &str| {
        ClockTime::parse(text).map_err(|_| ExtractionError::Unexpected {
            field,
            text: text.to_string(),
        })
    };
    let departure = clock("departure time", departure_time)?;
    let arrival = clock("arrival time", arrival_time)?;

    let date = if arrives_next_day(departure, arrival) {
        journey_date
            .next_day()
            .ok_or_else(|| ExtractionError::Unexpected {
                field: "journey date",
                text: journey_date.to_string(),
            })?
    } else {
        journey_date
    };
    Ok(date.to_day_month())
}

fn operating_days<B: TrainBlock + ?Sized>(block: &B) -> Result<Vec<Weekday>, ExtractionError> {
    let cells = block.day_cells()?;
    Ok(WEEK
        .iter()
        .zip(&cells)
        .filter(|(_, cell)| cell.trim() == RUNS_MARKER)
        .map(|(day, _)| *day)
        .collect())
}

fn available_classes<B: TrainBlock + ?Sized>(block: &B) -> Result<Vec<String>, ExtractionError> {
    Ok(block
        .class_labels()?
        .iter()
        .map(|label| label.trim().to_string())
        .collect())
}
