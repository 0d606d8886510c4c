//! Normalization of rendered search results into train records.
//!
//! The browser hands over the rendered results page; everything from there
//! to a [`SearchResult`] happens here without further upstream calls.

mod block;
mod error;
mod extract;
mod page;
mod result;

pub use block::{HtmlTrainBlock, TrainBlock};
pub use error::ExtractionError;
pub use extract::{PageContext, extract_train};
pub use page::{
    NO_TRAINS_XPATH, TRAIN_BLOCK_CSS, has_no_trains_marker, normalize_results_page, train_blocks,
};
pub use result::{NO_TRAINS_MESSAGE, SearchResult};
