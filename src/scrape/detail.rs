use scraper::Html;
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::fetch::PageFetcher;
use crate::models::job::{JobDetail, JobSummary};
use crate::scrape::{Selectors, extract_text};

/// Visits each posting's own page and pulls the full description and
/// the salary line the listing view does not carry.
pub struct DetailScraper<'a> {
    fetcher: &'a dyn PageFetcher,
    selectors: &'a Selectors,
}

impl<'a> DetailScraper<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, selectors: &'a Selectors) -> Self {
        Self { fetcher, selectors }
    }

    pub async fn enrich(&self, summary: &JobSummary) -> Result<JobDetail, PipelineError> {
        let html = self.fetcher.fetch(&summary.url).await?;
        let document = Html::parse_document(&html);
        let root = document.root_element();

        Ok(JobDetail {
            summary: summary.clone(),
            description: extract_text(root, &self.selectors.description).unwrap_or_default(),
            salary: extract_text(root, &self.selectors.salary).unwrap_or_default(),
        })
    }

    /// Enrich every summary in order. A record without a url, or whose
    /// page cannot be fetched, is skipped rather than failing the run.
    pub async fn enrich_all(&self, summaries: &[JobSummary]) -> Vec<JobDetail> {
        let mut details = Vec::new();
        for summary in summaries {
            if summary.url.is_empty() {
                warn!("Skipping '{}': no posting url", summary.title);
                continue;
            }
            match self.enrich(summary).await {
                Ok(detail) => details.push(detail),
                Err(e) => warn!("Skipping {}: {e}", summary.url),
            }
        }
        info!("Enriched {} of {} postings", details.len(), summaries.len());
        details
    }
}
