//! Scraping infrastructure - page fetching and listing extraction

mod listing_parser;
mod page_source;

pub use listing_parser::{ListingParser, ListingSelectors};
pub use page_source::{HttpPageSource, PageSource};
