// src/pipeline.rs

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::extract::{self, ExtractOptions, ResultSet};
use crate::fetch::Fetcher;
use scraper::Html;

/// Fetch the configured page and extract its states table.
pub fn scrape(config: &ScrapeConfig) -> Result<ResultSet, ScrapeError> {
    let url = config.validate()?;
    let html = Fetcher::new(config)?.fetch(&url)?;
    scrape_html(&html, &config.extract_options())
}

/// Extraction on already-fetched markup. Pure: same input, same output.
pub fn scrape_html(html: &str, opts: &ExtractOptions) -> Result<ResultSet, ScrapeError> {
    let document = Html::parse_document(html);
    let table = extract::locate_table(&document)?;
    extract::extract_rows(table, opts)
}
