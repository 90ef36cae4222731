// src/extract/layout.rs
//
// Every positional assumption about the page lives here. The target table has no
// id or class, so it is picked by position; when Wikipedia reshuffles the page
// this file is where things break first.

use scraper::ElementRef;
use std::fmt;

/// Zero-based position of the states table among all `<table>` elements.
pub const TABLE_INDEX: usize = 1;

/// Column-label rows at the top of the table.
pub const HEADER_ROWS: usize = 2;

/// Data cell whose `colspan` flags a merged capital/largest-city column.
pub const MERGED_CELL_INDEX: usize = 1;

/// `colspan` value of the merged column.
pub const MERGED_COLSPAN: u32 = 2;

/// Shape of a data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Capital and largest city in separate columns.
    Standard,
    /// Capital is also the largest city; one merged column shifts the rest left.
    Compact,
}

impl Layout {
    /// Pick the layout from the `colspan` attribute of the merged-cell candidate.
    pub fn from_colspan(colspan: Option<&str>) -> Self {
        match colspan.and_then(|v| v.trim().parse::<u32>().ok()) {
            Some(MERGED_COLSPAN) => Layout::Compact,
            _ => Layout::Standard,
        }
    }

    /// Detect from a row's `<td>` cells. Rows too short to hold the merged
    /// cell fall back to standard and fail the width check later.
    pub fn detect(cells: &[ElementRef<'_>]) -> Self {
        Self::from_colspan(
            cells
                .get(MERGED_CELL_INDEX)
                .and_then(|cell| cell.value().attr("colspan")),
        )
    }

    pub const fn population_index(self) -> usize {
        match self {
            Layout::Standard => 4,
            Layout::Compact => 3,
        }
    }

    pub const fn area_index(self) -> usize {
        match self {
            Layout::Standard => 5,
            Layout::Compact => 4,
        }
    }

    /// Minimum `<td>` count a row of this layout must have.
    pub const fn required_cells(self) -> usize {
        self.area_index() + 1
    }

    pub const fn name(self) -> &'static str {
        match self {
            Layout::Standard => "standard",
            Layout::Compact => "compact",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
