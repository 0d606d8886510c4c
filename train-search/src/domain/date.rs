//! Journey date parsing.
//!
//! Callers send dates as free text. Only day/month/year with a `/` or `-`
//! separator and a four-digit year is accepted.

use std::fmt;

use chrono::{Days, NaiveDate};

/// Accepted input formats, tried in order. The first one that parses wins.
const ACCEPTED_FORMATS: [DateFormat; 2] = [
    DateFormat {
        pattern: "%d/%m/%Y",
        separator: '/',
    },
    DateFormat {
        pattern: "%d-%m-%Y",
        separator: '-',
    },
];

/// Error returned when a date string matches none of the accepted formats.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Date '{input}' not in dd/mm/YYYY or dd-mm-YYYY format")]
pub struct InvalidDateFormat {
    input: String,
}

impl InvalidDateFormat {
    /// The string that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

#[derive(Debug, Clone, Copy)]
struct DateFormat {
    pattern: &'static str,
    separator: char,
}

impl DateFormat {
    fn try_parse(&self, s: &str) -> Option<NaiveDate> {
        // chrono skips whitespace before numeric fields; the input must not.
        if s.chars().any(char::is_whitespace) {
            return None;
        }
        // chrono's %Y accepts any digit count, so pin the year to four digits.
        let (_, year) = s.rsplit_once(self.separator)?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        NaiveDate::parse_from_str(s, self.pattern).ok()
    }
}

/// A calendar date for a journey, with no time component.
///
/// # Examples
///
/// ```
/// use train_search::domain::JourneyDate;
///
/// let a = JourneyDate::parse("27/05/2025").unwrap();
/// let b = JourneyDate::parse("27-05-2025").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "27/05/2025");
///
/// assert!(JourneyDate::parse("2025-05-27").is_err());
/// assert!(JourneyDate::parse("31/02/2025").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JourneyDate(NaiveDate);

impl JourneyDate {
    /// Parse a date string against the accepted formats.
    pub fn parse(s: &str) -> Result<Self, InvalidDateFormat> {
        ACCEPTED_FORMATS
            .iter()
            .find_map(|format| format.try_parse(s))
            .map(Self)
            .ok_or_else(|| InvalidDateFormat {
                input: s.to_string(),
            })
    }

    /// Returns the underlying calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The following calendar day.
    pub fn next_day(&self) -> Option<Self> {
        self.0.checked_add_days(Days::new(1)).map(Self)
    }

    /// Format as `DD-MM-YYYY`.
    pub fn to_dashed(&self) -> String {
        self.0.format("%d-%m-%Y").to_string()
    }

    /// Format as `DD Mon`, e.g. `28 May`.
    pub fn to_day_month(&self) -> String {
        self.0.format("%d %b").to_string()
    }
}

impl From<NaiveDate> for JourneyDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Displays as `DD/MM/YYYY`, the format typed into the search form.
impl fmt::Display for JourneyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%d/%m/%Y"))
    }
}
