//! Client code for the appraiser roster search.
//!
//! This crate provides the HTTP form transport, result page extraction, and
//! the paginating query engine used by the server.

pub mod extract;
pub mod fetch;
pub mod search;

#[cfg(test)]
pub(crate) mod fixtures;

pub use extract::{
    DocumentReader, HtmlDocument, HumanNameParser, NameParser, ParsedName, ResultExtractor, ResultPage, extract_page,
};
pub use fetch::{FormClient, FormClientConfig, Transport};
pub use search::{AppraiserSearch, SearchOptions, SearchOutcome, SearchSettings, build_form};
