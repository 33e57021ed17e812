//! Result extraction for roster search pages.
//!
//! ### Page layout
//! - Top-level table 0: summary line (`N records were found`) in its first cell's second `<span>`.
//! - Top-level table 1: the data table; row 0 is the header, every other row is one appraiser.
//! - Top-level table 3: pager; a second cell is present only when a next page exists.
//!
//! ### Seams
//! - [`DocumentReader`] hides positional HTML traversal.
//! - [`NameParser`] splits raw name cells.

pub mod name;
pub mod reader;
pub mod row;

pub use name::{HumanNameParser, NameParser, ParsedName};
pub use reader::{Cell, DocumentReader, HtmlDocument, Row, Run};
pub use row::{Address, parse_address, parse_row, split_city_state_zip, split_zip};

use std::sync::LazyLock;

use appraisers_core::{AppraiserRecord, Error};
use regex::Regex;

const SUMMARY_TABLE: usize = 0;
const DATA_TABLE: usize = 1;
const PAGER_TABLE: usize = 3;

static RECORD_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d,]+) records were").expect("invalid record count pattern"));

/// One fetched page, reduced to what the query loop needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPage {
    pub rows: Vec<AppraiserRecord>,
    pub can_continue: bool,
    /// Total match count as printed in the page summary, when present.
    pub total_records: Option<u64>,
}

/// Extractor over a single result page.
pub struct ResultExtractor<R: DocumentReader = HtmlDocument, N: NameParser = HumanNameParser> {
    reader: R,
    names: N,
}

impl ResultExtractor {
    /// Parse an HTML body with the default reader and name parser.
    pub fn new(html: &str) -> Self {
        Self { reader: HtmlDocument::parse(html), names: HumanNameParser }
    }
}

impl<R: DocumentReader, N: NameParser> ResultExtractor<R, N> {
    pub fn with_parts(reader: R, names: N) -> Self {
        Self { reader, names }
    }

    /// Every data row of the page, header skipped.
    ///
    /// Any row that does not match a known shape fails the whole page.
    pub fn extract_rows(&self) -> Result<Vec<AppraiserRecord>, Error> {
        let rows = self
            .reader
            .table_rows(DATA_TABLE)
            .ok_or_else(|| Error::MalformedDocument(format!("top-level table {DATA_TABLE} not found")))?;

        rows.iter()
            .enumerate()
            .skip(1)
            .map(|(index, row)| parse_row(index, row, &self.names))
            .collect()
    }

    /// Whether the pager offers a next page.
    pub fn can_continue(&self) -> bool {
        self.reader.has_cell(PAGER_TABLE, 1)
    }

    /// Total match count from the summary line, e.g. `1,234 records were found` -> 1234.
    pub fn total_records(&self) -> Option<u64> {
        let summary = self.reader.span_text(SUMMARY_TABLE, 0, 1)?;
        let digits: String = RECORD_COUNT.captures(&summary)?.get(1)?.as_str().replace(',', "");
        digits.parse().ok()
    }

    pub fn into_page(self) -> Result<ResultPage, Error> {
        Ok(ResultPage { rows: self.extract_rows()?, can_continue: self.can_continue(), total_records: self.total_records() })
    }
}

/// Parse and extract one page body in a single synchronous step.
///
/// The parsed document is not `Send`, so async callers go through here rather
/// than holding an extractor across an await point.
pub fn extract_page(body: &str) -> Result<ResultPage, Error> {
    ResultExtractor::new(body).into_page()
}
