//! Results page normalization.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;

use super::block::HtmlTrainBlock;
use super::extract::{PageContext, extract_train};
use super::result::{NO_TRAINS_MESSAGE, SearchResult};

/// One rendered train result.
pub const TRAIN_BLOCK_CSS: &str = "app-train-avl-enq > div.ng-star-inserted";

/// Element that may carry the "no trains" notice.
pub const NO_TRAINS_XPATH: &str = "//div[contains(text(),'No trains available')]";

static TRAIN_BLOCK: LazyLock<Selector> = LazyLock::new(|| {
    // Literal selector; cannot fail.
    Selector::parse(TRAIN_BLOCK_CSS).expect("static selector must parse")
});
static DIV: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div").expect("static selector must parse"));

/// Whether any `div` announces that no trains run.
///
/// Only the first direct text node of each `div` is checked, the same node
/// `contains(text(), ...)` in [`NO_TRAINS_XPATH`] compares against.
pub fn has_no_trains_marker(document: &Html) -> bool {
    document.select(&DIV).any(|div| {
        div.children()
            .find_map(|node| node.value().as_text())
            .is_some_and(|text| text.contains(NO_TRAINS_MESSAGE))
    })
}

/// Train blocks in document order.
pub fn train_blocks(document: &Html) -> impl Iterator<Item = HtmlTrainBlock<'_>> {
    document.select(&TRAIN_BLOCK).map(HtmlTrainBlock::new)
}

/// Turn a rendered results page into a search result.
///
/// The "no trains" notice takes precedence over any blocks on the page.
pub fn normalize_results_page(html: &str, ctx: &PageContext) -> SearchResult {
    let document = Html::parse_document(html);

    if has_no_trains_marker(&document) {
        debug!("results page reports no trains");
        return SearchResult::no_trains();
    }

    let trains: Vec<_> = train_blocks(&document)
        .map(|block| extract_train(&block, ctx))
        .collect();
    debug!(count = trains.len(), "extracted trains from results page");

    SearchResult::found(trains)
}
