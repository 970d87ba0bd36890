use std::path::{Path, PathBuf};

use chrono::Local;
use reqwest::Client;
use tokio::task::spawn_blocking;

use crate::parse::parse_year_table;
use crate::request::{build_client, request_year_html, year_url};
use crate::table::{Dataset, NormalizedTable};
use crate::{info_time, warn_time, Error, Result, ScrapeConfig};

/// What a finished run produced.
#[derive(Debug)]
pub struct ScrapeReport {
    pub output: PathBuf,
    pub rows: usize,
    pub scraped: Vec<u16>,
    /// Seasons that failed, with the reason.
    pub skipped: Vec<(u16, String)>,
    /// Every diagnostic line printed to stderr, in order.
    pub log: Vec<String>,
}

/// Scrapes every configured season one after another and writes the CSV.
/// A failing season is logged and skipped. Returns `Error::NoData` if none succeeded,
/// in which case the output file is not touched.
pub async fn process_site(config: &ScrapeConfig) -> Result<ScrapeReport> {
    let start_time = Local::now();
    let client = build_client()?;

    let mut tables: Vec<NormalizedTable> = Vec::with_capacity(config.years.len());
    let mut skipped = Vec::new();
    let mut log = Vec::with_capacity(config.years.len() + 1);

    for year in config.years.clone() {
        match scrape_year(&client, &config.base_url, year).await {
            Ok(table) => {
                log.push(info_time!("Fetched {year}: {} rows", table.rows().len()));
                tables.push(table);
                tokio::time::sleep(config.delay).await;
            }
            Err(e) if e.is_per_year() => {
                log.push(warn_time!("{year}: {e}"));
                skipped.push((year, e.to_string()));
            }
            Err(e) => return Err(e),
        }
    }

    if tables.is_empty() {
        return Err(Error::NoData);
    }

    let scraped = tables.iter().map(|t| t.year()).collect();
    let mut dataset = Dataset::concat(tables);
    dataset.drop_artifact_columns();

    write_dataset(&dataset, &config.output).await?;
    log.push(info_time!(
        start_time,
        "Wrote {} ({} rows)",
        config.output.display(),
        dataset.rows().len()
    ));

    Ok(ScrapeReport {
        output: config.output.clone(),
        rows: dataset.rows().len(),
        scraped,
        skipped,
        log,
    })
}

/// Process exit status for a finished run: 0 when a file was written, 1 otherwise.
pub fn exit_status(result: &Result<ScrapeReport>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Fetch + parse for a single season.
async fn scrape_year(client: &Client, base_url: &str, year: u16) -> Result<NormalizedTable> {
    let html = request_year_html(client, base_url, year).await?;
    let url = year_url(base_url, year);

    // `Html` isn't `Send`, so parsing stays on the blocking pool.
    spawn_blocking(move || parse_year_table(&html, year, &url)).await?
}

/// Serializes the whole dataset first, so a failed run never leaves half a file behind.
pub async fn write_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    let bytes = dataset.to_csv_bytes()?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
