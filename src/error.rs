// src/error.rs

use std::fmt;

/// Which numeric column of a row failed to coerce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Population,
    Area,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Population => f.write_str("population"),
            Field::Area => f.write_str("area"),
        }
    }
}

/// Why a row could not be mapped onto a record.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeProblem {
    #[error("row has no header cell")]
    MissingHeaderCell,

    #[error("header cell has no link")]
    MissingAnchor,

    #[error("{layout} layout needs {needed} data cells, row has {found}")]
    TooFewCells {
        layout: &'static str,
        needed: usize,
        found: usize,
    },
}

/// Everything that can go wrong between the GET and the finished record set.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("fetch: request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetch: {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("locate: expected table not found (wanted table #{wanted}, page has {found})")]
    Structure { wanted: usize, found: usize },

    #[error("extract: row {row}: {problem}")]
    RowShape { row: usize, problem: ShapeProblem },

    #[error("parse: row {row}: {field} text {text:?} is not an integer")]
    NumericParse {
        row: usize,
        field: Field,
        text: String,
    },

    #[error("config: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            ScrapeError::Network { .. } | ScrapeError::HttpStatus { .. } => "fetch",
            ScrapeError::Structure { .. } => "locate",
            ScrapeError::RowShape { .. } => "extract",
            ScrapeError::NumericParse { .. } => "parse",
            ScrapeError::Config(_) => "config",
        }
    }

    /// Row index for row-level failures.
    pub fn row(&self) -> Option<usize> {
        match self {
            ScrapeError::RowShape { row, .. } | ScrapeError::NumericParse { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// Row-level errors are the only ones lenient mode may skip past.
    pub fn is_row_level(&self) -> bool {
        self.row().is_some()
    }
}
