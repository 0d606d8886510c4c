//! Access to the parts of one rendered train block.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use super::error::ExtractionError;

fn selector(css: &'static str) -> Selector {
    // Only called with the literal selectors below.
    Selector::parse(css).expect("static selector must parse")
}

static HEADING: LazyLock<Selector> = LazyLock::new(|| selector(".train-heading strong"));
static SCHEDULE: LazyLock<Selector> = LazyLock::new(|| selector(".white-back.no-pad"));
static TIME: LazyLock<Selector> = LazyLock::new(|| selector(".time"));
static DATE_ANNOTATION: LazyLock<Selector> = LazyLock::new(|| selector(".hidden-xs"));
static DAY_CELL: LazyLock<Selector> = LazyLock::new(|| selector(".remove-padding.col-xs-4 .Y"));
static CLASS_LABEL: LazyLock<Selector> = LazyLock::new(|| selector(".pre-avl strong"));

/// The raw pieces of one train's search result.
///
/// Each accessor fails independently so a missing region only costs the
/// fields that depend on it.
pub trait TrainBlock {
    /// Heading text, e.g. `"Gorakhdham Exp (12555)"`.
    fn heading(&self) -> Result<String, ExtractionError>;

    /// Time strings in the schedule region, departure first.
    fn times(&self) -> Result<Vec<String>, ExtractionError>;

    /// Hidden schedule annotation holding the departure weekday and date.
    fn date_annotation(&self) -> Result<String, ExtractionError>;

    /// Text of the weekday indicator cells, Monday first.
    fn day_cells(&self) -> Result<Vec<String>, ExtractionError>;

    /// Class labels in document order.
    fn class_labels(&self) -> Result<Vec<String>, ExtractionError>;
}

/// A train block backed by a parsed HTML element.
#[derive(Debug, Clone, Copy)]
pub struct HtmlTrainBlock<'a> {
    element: ElementRef<'a>,
}

impl<'a> HtmlTrainBlock<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    fn schedule(&self) -> Result<ElementRef<'a>, ExtractionError> {
        self.element
            .select(&SCHEDULE)
            .next()
            .ok_or(ExtractionError::MissingElement("schedule"))
    }
}

/// Visible text of an element with whitespace runs collapsed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

impl TrainBlock for HtmlTrainBlock<'_> {
    fn heading(&self) -> Result<String, ExtractionError> {
        self.element
            .select(&HEADING)
            .next()
            .map(element_text)
            .ok_or(ExtractionError::MissingElement("heading"))
    }

    fn times(&self) -> Result<Vec<String>, ExtractionError> {
        Ok(self.schedule()?.select(&TIME).map(element_text).collect())
    }

    fn date_annotation(&self) -> Result<String, ExtractionError> {
        self.schedule()?
            .select(&DATE_ANNOTATION)
            .next()
            .map(element_text)
            .ok_or(ExtractionError::MissingElement("date annotation"))
    }

    fn day_cells(&self) -> Result<Vec<String>, ExtractionError> {
        Ok(self.schedule()?.select(&DAY_CELL).map(element_text).collect())
    }

    fn class_labels(&self) -> Result<Vec<String>, ExtractionError> {
        Ok(self.element.select(&CLASS_LABEL).map(element_text).collect())
    }
}
