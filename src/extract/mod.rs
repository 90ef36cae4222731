// src/extract/mod.rs

pub mod layout;
pub mod utils;

use crate::config::Mode;
use crate::error::{Field, ScrapeError, ShapeProblem};
use layout::{Layout, HEADER_ROWS, TABLE_INDEX};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::{debug, info, warn};

static TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("table selector should parse"));
static ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("tr selector should parse"));
static HEADER_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th").expect("th selector should parse"));
static DATA_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("td selector should parse"));
static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("a selector should parse"));

/// One state as read from the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateRecord {
    #[serde(rename = "state")]
    pub name: String,
    pub population: u64,
    pub area: u64,
}

/// A row dropped in lenient mode.
#[derive(Debug)]
pub struct SkippedRow {
    /// Zero-based index among all rows of the table, header rows included.
    pub row: usize,
    pub error: ScrapeError,
}

/// Extracted records in table order, plus whatever lenient mode skipped.
#[derive(Debug, Default)]
pub struct ResultSet {
    pub records: Vec<StateRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub mode: Mode,
    pub strip_footnotes: bool,
}

/// The table at `TABLE_INDEX`, in document order.
pub fn locate_table(document: &Html) -> Result<ElementRef<'_>, ScrapeError> {
    let tables: Vec<ElementRef<'_>> = document.select(&TABLE).collect();
    match tables.get(TABLE_INDEX) {
        Some(table) => {
            debug!(found = tables.len(), index = TABLE_INDEX, "located table");
            Ok(*table)
        }
        None => Err(ScrapeError::Structure {
            wanted: TABLE_INDEX,
            found: tables.len(),
        }),
    }
}

/// Map every non-header row of `table` onto a `StateRecord`.
pub fn extract_rows(
    table: ElementRef<'_>,
    opts: &ExtractOptions,
) -> Result<ResultSet, ScrapeError> {
    let mut out = ResultSet::default();

    for (idx, row) in table.select(&ROW).enumerate().skip(HEADER_ROWS) {
        match extract_row(idx, row, opts) {
            Ok(record) => out.records.push(record),
            Err(e) if opts.mode == Mode::Lenient && e.is_row_level() => {
                warn!(row = idx, error = %e, "skipping row");
                out.skipped.push(SkippedRow { row: idx, error: e });
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        records = out.records.len(),
        skipped = out.skipped.len(),
        mode = %opts.mode,
        "extracted rows"
    );
    Ok(out)
}

fn extract_row(
    idx: usize,
    row: ElementRef<'_>,
    opts: &ExtractOptions,
) -> Result<StateRecord, ScrapeError> {
    let shape = |problem: ShapeProblem| ScrapeError::RowShape { row: idx, problem };

    let header = row
        .select(&HEADER_CELL)
        .next()
        .ok_or_else(|| shape(ShapeProblem::MissingHeaderCell))?;
    let anchor = header
        .select(&ANCHOR)
        .next()
        .ok_or_else(|| shape(ShapeProblem::MissingAnchor))?;
    let name = utils::element_text(anchor);

    let cells: Vec<ElementRef<'_>> = row.select(&DATA_CELL).collect();
    let layout = Layout::detect(&cells);
    if cells.len() < layout.required_cells() {
        return Err(shape(ShapeProblem::TooFewCells {
            layout: layout.name(),
            needed: layout.required_cells(),
            found: cells.len(),
        }));
    }
    debug!(row = idx, state = %name, layout = %layout, "row layout");

    let population = numeric_cell(
        idx,
        Field::Population,
        cells[layout.population_index()],
        opts,
    )?;
    let area = numeric_cell(idx, Field::Area, cells[layout.area_index()], opts)?;

    Ok(StateRecord {
        name,
        population,
        area,
    })
}

fn numeric_cell(
    idx: usize,
    field: Field,
    cell: ElementRef<'_>,
    opts: &ExtractOptions,
) -> Result<u64, ScrapeError> {
    let text = utils::element_text(cell);
    utils::parse_count(&text, opts.strip_footnotes).ok_or(ScrapeError::NumericParse {
        row: idx,
        field,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    const FIXTURE: &str = include_str!("../../tests/fixtures/states_table.html");

    fn table_page(rows: &str) -> String {
        format!(
            r#"<html><body>
            <table><tr><td>lead</td></tr></table>
            <table>
              <tr><th>State</th></tr>
              <tr><th></th></tr>
              {}
            </table>
            </body></html>"#,
            rows
        )
    }

    fn run(html: &str, opts: ExtractOptions) -> Result<ResultSet, ScrapeError> {
        let doc = Html::parse_document(html);
        let table = locate_table(&doc)?;
        extract_rows(table, &opts)
    }

    fn lenient() -> ExtractOptions {
        ExtractOptions {
            mode: Mode::Lenient,
            ..Default::default()
        }
    }

    fn rec(name: &str, population: u64, area: u64) -> StateRecord {
        StateRecord {
            name: name.to_string(),
            population,
            area,
        }
    }

    #[test]
    fn fixture_mixes_both_layouts_in_order() -> Result<()> {
        let set = run(FIXTURE, ExtractOptions::default())?;
        assert!(set.skipped.is_empty());
        assert_eq!(
            set.records,
            vec![
                rec("Alabama", 5_024_279, 52_420),
                rec("Arizona", 7_151_502, 113_990),
                rec("California", 39_538_223, 163_696),
                rec("Hawaii", 1_455_271, 10_932),
            ]
        );
        Ok(())
    }

    #[test]
    fn row_count_is_table_rows_minus_headers() -> Result<()> {
        let doc = Html::parse_document(FIXTURE);
        let table = locate_table(&doc)?;
        let total_rows = table.select(&ROW).count();
        let set = extract_rows(table, &ExtractOptions::default())?;
        assert_eq!(set.len(), total_rows - HEADER_ROWS);
        Ok(())
    }

    #[test]
    fn standard_row_reads_cells_four_and_five() -> Result<()> {
        let html = table_page(
            r#"<tr><th><a href="/wiki/California">California</a></th>
               <td>CA</td><td>1</td><td>2</td><td>3</td><td>39,538,223</td><td>163,696</td></tr>"#,
        );
        let set = run(&html, ExtractOptions::default())?;
        assert_eq!(set.records, vec![rec("California", 39_538_223, 163_696)]);
        Ok(())
    }

    #[test]
    fn compact_row_reads_cells_three_and_four() -> Result<()> {
        let html = table_page(
            r#"<tr><th><a>Somewhere</a></th>
               <td>SW</td><td colspan="2">Capital City</td><td>1850</td><td>19,000,000</td><td>55,000</td></tr>"#,
        );
        let set = run(&html, ExtractOptions::default())?;
        assert_eq!(set.records, vec![rec("Somewhere", 19_000_000, 55_000)]);
        Ok(())
    }

    #[test]
    fn fewer_than_two_tables_is_structure_error() {
        let doc = Html::parse_document("<html><body><table><tr><td>1</td></tr></table></body></html>");
        match locate_table(&doc) {
            Err(ScrapeError::Structure { wanted, found }) => {
                assert_eq!(wanted, 1);
                assert_eq!(found, 1);
            }
            other => panic!("expected Structure, got {:?}", other.map(|t| t.html())),
        }
    }

    #[test]
    fn footnote_aborts_in_strict_mode() {
        let html = table_page(
            r#"<tr><th><a>First</a></th><td>F</td><td>c</td><td>l</td><td>d</td><td>1,000</td><td>10</td></tr>
               <tr><th><a>Second</a></th><td>S</td><td>c</td><td>l</td><td>d</td><td>1,234[note]</td><td>20</td></tr>
               <tr><th><a>Third</a></th><td>T</td><td>c</td><td>l</td><td>d</td><td>3,000</td><td>30</td></tr>"#,
        );
        let err = run(&html, ExtractOptions::default()).unwrap_err();
        match err {
            ScrapeError::NumericParse { row, field, text } => {
                assert_eq!(row, 3);
                assert_eq!(field, Field::Population);
                assert_eq!(text, "1,234[note]");
            }
            other => panic!("expected NumericParse, got {:?}", other),
        }
    }

    #[test]
    fn footnote_row_skipped_in_lenient_mode() -> Result<()> {
        let html = table_page(
            r#"<tr><th><a>First</a></th><td>F</td><td>c</td><td>l</td><td>d</td><td>1,000</td><td>10</td></tr>
               <tr><th><a>Second</a></th><td>S</td><td>c</td><td>l</td><td>d</td><td>1,234[note]</td><td>20</td></tr>
               <tr><th><a>Third</a></th><td>T</td><td>c</td><td>l</td><td>d</td><td>3,000</td><td>30</td></tr>"#,
        );
        let set = run(&html, lenient())?;
        assert_eq!(set.records, vec![rec("First", 1_000, 10), rec("Third", 3_000, 30)]);
        assert_eq!(set.skipped.len(), 1);
        assert_eq!(set.skipped[0].row, 3);
        assert_eq!(set.skipped[0].error.stage(), "parse");
        Ok(())
    }

    #[test]
    fn footnote_stripping_keeps_the_row() -> Result<()> {
        let html = table_page(
            r#"<tr><th><a>Second</a></th><td>S</td><td>c</td><td>l</td><td>d</td><td>1,234<sup>[note]</sup></td><td>20</td></tr>"#,
        );
        let opts = ExtractOptions {
            strip_footnotes: true,
            ..Default::default()
        };
        let set = run(&html, opts)?;
        assert_eq!(set.records, vec![rec("Second", 1_234, 20)]);
        Ok(())
    }

    #[test]
    fn missing_header_cell_or_anchor_is_row_shape_error() {
        let no_th = table_page(r#"<tr><td>a</td><td>b</td><td>c</td><td>d</td><td>1</td><td>2</td></tr>"#);
        match run(&no_th, ExtractOptions::default()).unwrap_err() {
            ScrapeError::RowShape { row, problem } => {
                assert_eq!(row, 2);
                assert_eq!(problem, ShapeProblem::MissingHeaderCell);
            }
            other => panic!("expected RowShape, got {:?}", other),
        }

        let no_anchor =
            table_page(r#"<tr><th>Plain</th><td>a</td><td>b</td><td>c</td><td>d</td><td>1</td><td>2</td></tr>"#);
        match run(&no_anchor, ExtractOptions::default()).unwrap_err() {
            ScrapeError::RowShape { problem, .. } => assert_eq!(problem, ShapeProblem::MissingAnchor),
            other => panic!("expected RowShape, got {:?}", other),
        }
    }

    #[test]
    fn short_row_is_row_shape_error() {
        let html = table_page(r#"<tr><th><a>Short</a></th><td>S</td><td colspan="2">c</td><td>d</td><td>1</td></tr>"#);
        match run(&html, ExtractOptions::default()).unwrap_err() {
            ScrapeError::RowShape { problem, .. } => assert_eq!(
                problem,
                ShapeProblem::TooFewCells {
                    layout: "compact",
                    needed: 5,
                    found: 4,
                }
            ),
            other => panic!("expected RowShape, got {:?}", other),
        }

        let set = run(&html, lenient()).expect("lenient run");
        assert!(set.is_empty());
        assert_eq!(set.skipped[0].error.stage(), "extract");
    }

    #[test]
    fn extraction_is_repeatable() -> Result<()> {
        let first = run(FIXTURE, ExtractOptions::default())?;
        let second = run(FIXTURE, ExtractOptions::default())?;
        assert_eq!(first.records, second.records);
        Ok(())
    }
}
