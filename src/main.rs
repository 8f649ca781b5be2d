mod board;
mod config;
mod error;
mod fetch;
mod models;
mod pipeline;
mod scrape;
mod store;
#[cfg(test)]
mod testing;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::board::hrflow::HrflowClient;
use crate::config::{BoardConfig, Command, Config};
use crate::fetch::HttpFetcher;
use crate::models::job::{JobDetail, JobSummary};
use crate::scrape::{Selectors, SiteProfile};
use crate::store::JsonlStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobfeed=info")),
        )
        .init();

    let config = Config::parse();
    let selectors = Selectors::compile(&SiteProfile::default())?;

    match config.command {
        Command::Scrape {
            url,
            max_pages,
            out,
        } => {
            let fetcher = HttpFetcher::new()?;
            let mut store = JsonlStore::<JobSummary>::create(&out)?;
            let count =
                pipeline::scrape_stage(&fetcher, &selectors, &url, max_pages, &mut store).await?;
            tracing::info!("Wrote {count} summaries to {}", out.display());
        }
        Command::Enrich { input, out } => {
            let fetcher = HttpFetcher::new()?;
            let summaries = JsonlStore::<JobSummary>::open(&input);
            let mut details = JsonlStore::<JobDetail>::create(&out)?;
            let count =
                pipeline::enrich_stage(&fetcher, &selectors, &summaries, &mut details).await?;
            tracing::info!("Wrote {count} details to {}", out.display());
        }
        Command::Index { input, board } => {
            let halt = board.halt_on_failure;
            let board_config = BoardConfig::from_args(&board)?;
            let client = HrflowClient::new(board_config.clone())?;
            let details = JsonlStore::<JobDetail>::open(&input);
            let report = pipeline::index_stage(&client, &board_config, &details, halt).await?;
            tracing::info!(
                "Indexed {} jobs ({} already on board, {} failed)",
                report.submitted,
                report.already_indexed,
                report.failed
            );
        }
        Command::Run {
            url,
            max_pages,
            summaries,
            details,
            board,
        } => {
            // Board credentials are checked before any crawling starts.
            let halt = board.halt_on_failure;
            let board_config = BoardConfig::from_args(&board)?;
            let client = HrflowClient::new(board_config.clone())?;
            let fetcher = HttpFetcher::new()?;

            let mut summary_store = JsonlStore::<JobSummary>::create(&summaries)?;
            pipeline::scrape_stage(&fetcher, &selectors, &url, max_pages, &mut summary_store)
                .await?;

            let mut detail_store = JsonlStore::<JobDetail>::create(&details)?;
            pipeline::enrich_stage(&fetcher, &selectors, &summary_store, &mut detail_store)
                .await?;

            let report = pipeline::index_stage(&client, &board_config, &detail_store, halt).await?;
            tracing::info!(
                "Pipeline complete: {} indexed, {} already on board, {} failed",
                report.submitted,
                report.already_indexed,
                report.failed
            );
        }
    }

    Ok(())
}
