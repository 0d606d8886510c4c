//! Field extraction errors.

/// A single field could not be read from a train block.
///
/// These never escape the extractor; the field takes a placeholder value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// A required element is absent from the block
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    /// Text was present but did not have the expected shape
    #[error("unexpected {field} text: {text:?}")]
    Unexpected { field: &'static str, text: String },
}
