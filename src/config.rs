// src/config.rs

use crate::error::ScrapeError;
use crate::extract::ExtractOptions;
use serde::Deserialize;
use std::{fmt, fs, path::Path, str::FromStr, time::Duration};
use url::Url;

pub const DEFAULT_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_states_and_territories_of_the_United_States";

/// Env vars consulted by `apply_env`, highest precedence after CLI flags.
pub const ENV_URL: &str = "STATES_URL";
pub const ENV_TIMEOUT_SECS: &str = "STATES_TIMEOUT_SECS";
pub const ENV_MODE: &str = "STATES_MODE";

/// How row-level failures are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// First bad row aborts the run.
    #[default]
    Strict,
    /// Bad rows are skipped and recorded.
    Lenient,
}

impl FromStr for Mode {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Mode::Strict),
            "lenient" => Ok(Mode::Lenient),
            other => Err(ScrapeError::Config(format!(
                "unknown mode {:?} (expected strict or lenient)",
                other
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Strict => f.write_str("strict"),
            Mode::Lenient => f.write_str("lenient"),
        }
    }
}

/// Command-line values; `None`/`false` leaves the layered value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub url: Option<String>,
    pub preview_rows: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub lenient: bool,
    pub strip_footnotes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub mode: Mode,
    pub strip_footnotes: bool,
    pub preview_rows: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("states_scraper/{}", env!("CARGO_PKG_VERSION")),
            mode: Mode::Strict,
            strip_footnotes: false,
            preview_rows: 5,
        }
    }
}

impl ScrapeConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScrapeError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| ScrapeError::Config(format!("invalid YAML: {}", e)))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ScrapeError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| ScrapeError::Config(format!("reading {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&raw)
    }

    /// Overlay `STATES_*` variables from the process environment.
    pub fn apply_env(self) -> Result<Self, ScrapeError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay variables from an arbitrary lookup; empty values are ignored.
    pub fn apply_vars<F>(mut self, lookup: F) -> Result<Self, ScrapeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_URL) {
            self.url = url.trim().to_string();
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            self.timeout_secs = secs.trim().parse().map_err(|_| {
                ScrapeError::Config(format!(
                    "{} must be a whole number, got {:?}",
                    ENV_TIMEOUT_SECS, secs
                ))
            })?;
        }
        if let Some(mode) = get(ENV_MODE) {
            self.mode = mode.parse()?;
        }
        Ok(self)
    }

    /// Apply command-line flags, the last and strongest layer.
    pub fn apply_overrides(mut self, flags: &Overrides) -> Self {
        if let Some(url) = &flags.url {
            self.url = url.clone();
        }
        if let Some(n) = flags.preview_rows {
            self.preview_rows = n;
        }
        if let Some(secs) = flags.timeout_secs {
            self.timeout_secs = secs;
        }
        if flags.lenient {
            self.mode = Mode::Lenient;
        }
        if flags.strip_footnotes {
            self.strip_footnotes = true;
        }
        self
    }

    /// Parse the source URL and reject unusable settings.
    pub fn validate(&self) -> Result<Url, ScrapeError> {
        let url = Url::parse(&self.url)
            .map_err(|e| ScrapeError::Config(format!("invalid url {:?}: {}", self.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScrapeError::Config(format!(
                "url scheme must be http or https, got {:?}",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ScrapeError::Config("timeout_secs must be positive".into()));
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            mode: self.mode,
            strip_footnotes: self.strip_footnotes,
        }
    }
}
