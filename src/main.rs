use brasileirao::{config::Config, info_time, logging, process::process_urls, Result};
use chrono::Local;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let config = Config::parse();

    let start_time = Local::now();
    let summary = process_urls(&config).await?;
    info_time!(
        start_time,
        "Scraped {} match(es) from {} page(s), {} page(s) failed.",
        summary.rows,
        summary.pages_ok,
        summary.pages_failed
    );

    Ok(())
}
