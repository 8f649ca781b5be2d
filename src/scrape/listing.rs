use std::collections::HashSet;

use chrono::Utc;
use scraper::{ElementRef, Html};
use tracing::{debug, info};
use url::Url;

use crate::error::PipelineError;
use crate::fetch::PageFetcher;
use crate::models::job::JobSummary;
use crate::scrape::{Selectors, extract_href, extract_text};

/// Crawls paginated listing pages and emits one summary per posting.
pub struct ListingScraper<'a> {
    fetcher: &'a dyn PageFetcher,
    selectors: &'a Selectors,
}

impl<'a> ListingScraper<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, selectors: &'a Selectors) -> Self {
        Self { fetcher, selectors }
    }

    /// Walk listing pages starting at `start_url`, following the
    /// next-page link until it disappears or `max_pages` is reached.
    /// A page that fails to load aborts the whole run; a posting field
    /// that fails to extract degrades to an empty string.
    pub async fn scrape(
        &self,
        start_url: &str,
        max_pages: Option<u32>,
    ) -> Result<Vec<JobSummary>, PipelineError> {
        let mut summaries = Vec::new();
        let mut seen = HashSet::new();
        let mut page_url = start_url.to_string();
        let mut pages = 0u32;

        loop {
            let html = self.fetcher.fetch(&page_url).await?;
            let document = Html::parse_document(&html);
            let base = Url::parse(&page_url)
                .map_err(|e| PipelineError::Navigation(format!("{page_url}: {e}")))?;

            let mut found = 0usize;
            for posting in document.select(&self.selectors.posting) {
                found += 1;
                let record = self.extract_posting(posting, &base);
                if !record.url.is_empty() && !seen.insert(record.url.clone()) {
                    debug!("Duplicate posting {}", record.url);
                    continue;
                }
                summaries.push(record);
            }
            pages += 1;
            info!(
                "Listing page {pages}: {found} postings, {} collected",
                summaries.len()
            );

            if let Some(limit) = max_pages
                && pages >= limit
            {
                break;
            }
            match extract_href(document.root_element(), &self.selectors.next_page) {
                Some(href) => page_url = resolve(&base, &href),
                None => {
                    debug!("No next-page link, crawl complete");
                    break;
                }
            }
        }

        Ok(summaries)
    }

    fn extract_posting(&self, element: ElementRef<'_>, base: &Url) -> JobSummary {
        let sel = self.selectors;
        let url = extract_href(element, &sel.link)
            .map(|href| resolve(base, &href))
            .unwrap_or_default();

        JobSummary {
            title: extract_text(element, &sel.title).unwrap_or_default(),
            company: extract_text(element, &sel.company).unwrap_or_default(),
            location: extract_text(element, &sel.location).unwrap_or_default(),
            summary: extract_text(element, &sel.summary).unwrap_or_default(),
            url,
            posted: extract_text(element, &sel.posted)
                .map(|text| clean_posted(&text))
                .unwrap_or_default(),
            captured_at: Utc::now().date_naive(),
        }
    }
}

/// Resolve a possibly-relative href against the page it appeared on.
fn resolve(base: &Url, href: &str) -> String {
    match base.join(href) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

/// Listing date cells read like "Posted3 days ago" or
/// "EmployerActive 2 days ago"; keep only the age part.
fn clean_posted(text: &str) -> String {
    let text = text.trim();
    let text = text.strip_prefix("PostedPosted").unwrap_or(text);
    let text = text.strip_prefix("Posted").unwrap_or(text);
    let text = text.strip_prefix("EmployerActive").unwrap_or(text);
    text.trim().to_string()
}
