//! FANTASYPROS PPR LEADERS SCRAPER
//! Fetches one leaderboard page per season, keeps the widest table,
//! normalizes its columns and writes every season into one CSV.

mod error;
mod macros;
pub mod parse;
pub mod process;
pub mod request;
pub mod table;

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

pub use error::{Error, Result};

/// Seasons to scrape, both ends included.
pub const YEARS: RangeInclusive<u16> = 2017..=2024;
pub const BASE_URL: &str = "https://www.fantasypros.com/nfl/reports/leaders/ppr.php";
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/123.0 Safari/537.36";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Pause after every scraped season.
pub const POLITE_DELAY: Duration = Duration::from_millis(1500);
pub const FILE_PATH: &str = "fantasypros_overall_leaders_ppr_2017_2024.csv";

/// Everything a run needs. The binary only uses `ScrapeConfig::default()`.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub years: RangeInclusive<u16>,
    pub base_url: String,
    pub delay: Duration,
    pub output: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            years: YEARS,
            base_url: BASE_URL.to_string(),
            delay: POLITE_DELAY,
            output: PathBuf::from(FILE_PATH),
        }
    }
}
