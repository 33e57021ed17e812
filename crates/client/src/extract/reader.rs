//! Positional access to the roster result page.
//!
//! The result page has no ids or classes to anchor on; everything is found by
//! position (nth top-level table, nth cell, nth `<font>` run). That contract
//! lives behind [`DocumentReader`] so the row parser only ever sees plain text.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

static TOP_LEVEL_TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body > table").expect("invalid selector"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("invalid selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("invalid selector"));
static RUN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("font").expect("invalid selector"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").expect("invalid selector"));

/// Text of one styled run, split at `<br>` boundaries.
///
/// Entities are decoded; non-breaking spaces are kept as U+00A0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub lines: Vec<String>,
}

impl Run {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self { lines: lines.into_iter().map(Into::into).collect() }
    }

    /// All lines joined by a single space.
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

/// One table cell reduced to its styled runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub runs: Vec<Run>,
}

impl Cell {
    pub fn run(&self, index: usize) -> Option<&Run> {
        self.runs.get(index)
    }
}

/// One table row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }
}

/// Positional reader over one result page.
pub trait DocumentReader {
    /// All rows of the nth top-level table, header included; None if the table is absent.
    fn table_rows(&self, table: usize) -> Option<Vec<Row>>;

    /// Whether the nth top-level table contains a cell at `cell`.
    fn has_cell(&self, table: usize, cell: usize) -> bool;

    /// Text of the nth `<span>` inside the given cell of the given top-level table.
    fn span_text(&self, table: usize, cell: usize, span: usize) -> Option<String>;
}

/// [`DocumentReader`] over an HTML document parsed with scraper.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    fn table(&self, index: usize) -> Option<ElementRef<'_>> {
        self.html.select(&TOP_LEVEL_TABLE).nth(index)
    }
}

impl DocumentReader for HtmlDocument {
    fn table_rows(&self, table: usize) -> Option<Vec<Row>> {
        let table = self.table(table)?;
        let rows = table
            .select(&ROW)
            .map(|tr| Row { cells: tr.select(&CELL).map(read_cell).collect() })
            .collect();
        Some(rows)
    }

    fn has_cell(&self, table: usize, cell: usize) -> bool {
        self.table(table).is_some_and(|t| t.select(&CELL).nth(cell).is_some())
    }

    fn span_text(&self, table: usize, cell: usize, span: usize) -> Option<String> {
        let cell = self.table(table)?.select(&CELL).nth(cell)?;
        let span = cell.select(&SPAN).nth(span)?;
        Some(span.text().collect())
    }
}

fn read_cell(td: ElementRef<'_>) -> Cell {
    Cell { runs: td.select(&RUN).map(read_run).collect() }
}

/// Walk the run in document order, starting a new line at every `<br>`.
fn read_run(font: ElementRef<'_>) -> Run {
    let mut lines = vec![String::new()];
    for node in font.descendants().skip(1) {
        match node.value() {
            Node::Text(text) => {
                if let Some(line) = lines.last_mut() {
                    line.push_str(text);
                }
            }
            Node::Element(el) if el.name().eq_ignore_ascii_case("br") => lines.push(String::new()),
            _ => {}
        }
    }
    Run { lines }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table><tr><td><span>Search results</span><span>1,234 records were found</span></td></tr></table>
        <table>
            <tr><td>Name</td><td>License</td><td>Address</td></tr>
            <tr>
                <td><font>PAUL M LEWIS MR</font></td>
                <td><font> AK123 </font><br><font>Certified Residential</font><br><font>12/31/2026</font></td>
                <td><font>ACME &amp; SONS<br>123 MAIN ST<br/>ANCHORAGE,&nbsp;AK&nbsp;995011234</font></td>
            </tr>
        </table>
        <table><tr><td>spacer</td></tr></table>
        <table><tr><td>Page 1</td><td><a href="?next">Next</a></td></tr></table>
        </body></html>
    "#;

    #[test]
    fn test_table_rows_include_header() {
        let doc = HtmlDocument::parse(PAGE);
        let rows = doc.table_rows(1).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells.len(), 3);
        assert!(rows[0].cells[0].runs.is_empty());
    }

    #[test]
    fn test_runs_split_on_br() {
        let doc = HtmlDocument::parse(PAGE);
        let rows = doc.table_rows(1).unwrap();
        let address = rows[1].cell(2).unwrap().run(0).unwrap();
        assert_eq!(address.lines, vec!["ACME & SONS", "123 MAIN ST", "ANCHORAGE,\u{a0}AK\u{a0}995011234"]);

        let license = rows[1].cell(1).unwrap();
        assert_eq!(license.runs.len(), 3);
        assert_eq!(license.runs[0].text(), " AK123 ");
        assert_eq!(license.runs[2].text(), "12/31/2026");
    }

    #[test]
    fn test_missing_table() {
        let doc = HtmlDocument::parse("<html><body><table><tr><td>only</td></tr></table></body></html>");
        assert!(doc.table_rows(0).is_some());
        assert!(doc.table_rows(1).is_none());
        assert!(!doc.has_cell(3, 1));
    }

    #[test]
    fn test_nested_tables_are_not_top_level() {
        let html = "<html><body><div><table><tr><td>nested</td></tr></table></div></body></html>";
        let doc = HtmlDocument::parse(html);
        assert!(doc.table_rows(0).is_none());
    }

    #[test]
    fn test_has_cell() {
        let doc = HtmlDocument::parse(PAGE);
        assert!(doc.has_cell(3, 1));
        assert!(!doc.has_cell(3, 2));
        assert!(!doc.has_cell(2, 1));
    }

    #[test]
    fn test_span_text() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(doc.span_text(0, 0, 1).as_deref(), Some("1,234 records were found"));
        assert!(doc.span_text(0, 0, 2).is_none());
        assert!(doc.span_text(1, 0, 0).is_none());
    }
}
