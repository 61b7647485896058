//! Command-line configuration.
//!
//! Every flag has a default, so `hn-front` with no arguments shows the live
//! front page with nine cards per page.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use crate::source::algolia::{AlgoliaSettings, DEFAULT_ENDPOINT};
use crate::view::{SortKey, ViewState};

#[derive(Debug, Parser)]
#[command(name = "hn-front", version, about = "Browse the Hacker News front page in your terminal")]
pub struct Cli {
    /// Algolia-compatible search endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// How many front-page stories to fetch (at most 100)
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub hits: u32,

    /// Cards per page
    #[arg(long, default_value_t = 9, value_parser = clap::value_parser!(u16).range(1..))]
    pub page_size: u16,

    /// Initial sort order: points, date or title
    #[arg(long, default_value = "points")]
    pub sort: SortKey,

    /// Initial search term
    #[arg(long, default_value = "")]
    pub search: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout: u64,

    /// Where to write the log
    #[arg(long, default_value = "hn-front.log")]
    pub log_file: PathBuf,

    /// Log verbosity (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", value_parser = parse_level)]
    pub log_level: LevelFilter,

    /// Do not write a log file
    #[arg(long)]
    pub no_log: bool,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("unknown log level `{s}`"))
}

impl Cli {
    pub fn algolia_settings(&self) -> AlgoliaSettings {
        AlgoliaSettings {
            endpoint: self.endpoint.clone(),
            hits: self.hits,
            timeout: Duration::from_secs(self.timeout),
        }
    }

    pub fn view_state(&self) -> ViewState {
        ViewState::new(self.search.clone(), self.sort)
    }

    pub fn page_size(&self) -> usize {
        usize::from(self.page_size)
    }
}
