pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod present;

pub use config::{Mode, ScrapeConfig};
pub use error::ScrapeError;
pub use extract::{ResultSet, StateRecord};
pub use pipeline::{scrape, scrape_html};
