use std::process::ExitCode;

use ppr_leaders::{
    process::{exit_status, process_site},
    ScrapeConfig,
};

#[tokio::main]
async fn main() -> ExitCode {
    let result = process_site(&ScrapeConfig::default()).await;
    if let Err(e) = &result {
        eprintln!("{e}");
    }
    ExitCode::from(exit_status(&result))
}
