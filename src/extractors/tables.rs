// src/extractors/tables.rs
//
// HTML financial-table parsing: per-table row/cell cleanup plus the
// table-of-contents lookup used to identify the filing's index table.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

// First rows of EDGAR financial tables are header/spacer noise.
const SKIPPED_HEADER_ROWS: usize = 2;

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Failed to compile TABLE_SELECTOR"));
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Failed to compile CELL_SELECTOR"));

static NON_ALNUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("Failed to compile NON_ALNUM_RE"));

/// One cleaned table: rows of trimmed cell texts. Cells that are empty
/// once markup and symbols are stripped are dropped; the surviving cells
/// keep their original trimmed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    /// First cell of the first row that has one; used to name the
    /// spreadsheet for this table.
    pub fn first_cell(&self) -> Option<&str> {
        self.rows
            .iter()
            .find_map(|row| row.first())
            .map(String::as_str)
    }

    fn has_content(&self) -> bool {
        self.rows.iter().any(|row| !row.is_empty())
    }
}

/// Parses every `<table>` in the markup into a cleaned `ParsedTable`,
/// skipping the first two rows of each and dropping tables left with no
/// content at all.
pub fn parse_tables(html: &str) -> Vec<ParsedTable> {
    let document = Html::parse_document(html);

    let tables: Vec<ParsedTable> = document
        .select(&TABLE_SELECTOR)
        .map(|table| {
            let rows = table
                .select(&ROW_SELECTOR)
                .skip(SKIPPED_HEADER_ROWS)
                .map(|row| {
                    row.select(&CELL_SELECTOR)
                        .filter_map(|cell| {
                            let text = cell.text().collect::<String>().trim().to_string();
                            let stripped = NON_ALNUM_RE.replace_all(&text, "");
                            (!stripped.is_empty()).then_some(text)
                        })
                        .collect::<Vec<String>>()
                })
                .collect();
            ParsedTable { rows }
        })
        .filter(ParsedTable::has_content)
        .collect();

    tracing::debug!("Parsed {} non-empty tables from document", tables.len());
    tables
}

/// The filing's index table, relabeled with fixed column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocTable {
    pub columns: [&'static str; 3],
    pub rows: Vec<Vec<String>>,
}

/// Scans all parsed tables for one where a single row mentions both
/// "Item 1" and "Risk Factors" -- the shape of a 10-K table of contents.
/// Returns `None` when no table matches.
pub fn find_toc(tables: &[ParsedTable]) -> Option<TocTable> {
    for table in tables {
        let is_toc = table.rows.iter().any(|row| {
            row.iter().any(|cell| cell.contains("Item 1"))
                && row.iter().any(|cell| cell.contains("Risk Factors"))
        });
        if is_toc {
            return Some(TocTable {
                columns: ["item", "section", "page"],
                rows: table.rows.clone(),
            });
        }
    }
    tracing::debug!("No table of contents found among {} tables", tables.len());
    None
}
