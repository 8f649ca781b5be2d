// Stage glue. Each stage reads records from one store, works through
// them one at a time, and writes results to the next store, so a run
// can stop and resume at any stage boundary.

use tracing::info;

use crate::board::JobBoard;
use crate::board::runner::{self, IndexReport};
use crate::config::BoardConfig;
use crate::error::PipelineError;
use crate::fetch::PageFetcher;
use crate::models::job::{JobDetail, JobSummary};
use crate::scrape::Selectors;
use crate::scrape::detail::DetailScraper;
use crate::scrape::listing::ListingScraper;
use crate::store::RecordStore;

/// Crawl listing pages and persist one summary per posting.
pub async fn scrape_stage(
    fetcher: &dyn PageFetcher,
    selectors: &Selectors,
    start_url: &str,
    max_pages: Option<u32>,
    store: &mut dyn RecordStore<JobSummary>,
) -> Result<usize, PipelineError> {
    let summaries = ListingScraper::new(fetcher, selectors)
        .scrape(start_url, max_pages)
        .await?;
    for summary in &summaries {
        store.append(summary)?;
    }
    info!("Scrape stage wrote {} summaries", summaries.len());
    Ok(summaries.len())
}

/// Visit each summary's posting page and persist the enriched records.
pub async fn enrich_stage(
    fetcher: &dyn PageFetcher,
    selectors: &Selectors,
    input: &dyn RecordStore<JobSummary>,
    output: &mut dyn RecordStore<JobDetail>,
) -> Result<usize, PipelineError> {
    let summaries = input.read_all()?;
    let details = DetailScraper::new(fetcher, selectors)
        .enrich_all(&summaries)
        .await;
    for detail in &details {
        output.append(detail)?;
    }
    info!("Enrich stage wrote {} details", details.len());
    Ok(details.len())
}

/// Push every stored detail record to the board.
pub async fn index_stage(
    board: &dyn JobBoard,
    config: &BoardConfig,
    input: &dyn RecordStore<JobDetail>,
    halt_on_failure: bool,
) -> Result<IndexReport, PipelineError> {
    let details = input.read_all()?;
    runner::run_index(board, config, &details, halt_on_failure).await
}
