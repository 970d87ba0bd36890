use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Transport Error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP Error: status {status} for {url}")]
    Http { status: u16, url: String },

    #[error("No tables found for {year} at {url}")]
    NotFound { year: u16, url: String },

    #[error("Couldn't parse the table for {year}: {reason}")]
    Parse { year: u16, reason: String },

    #[error("No data scraped.")]
    NoData,

    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn parse(year: u16, reason: impl Into<String>) -> Self {
        Error::Parse {
            year,
            reason: reason.into(),
        }
    }

    /// Errors that only cost us the current year. Anything else ends the run.
    pub fn is_per_year(&self) -> bool {
        matches!(
            self,
            Error::Transport(_)
                | Error::Http { .. }
                | Error::NotFound { .. }
                | Error::Parse { .. }
                | Error::RuntimeJoin(_)
        )
    }
}
