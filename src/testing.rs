//! Shared fixtures and fakes for the test suite.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::board::JobBoard;
use crate::board::payload::{IndexedJob, Skill};
use crate::config::{BoardConfig, DEFAULT_ENDPOINT};
use crate::error::PipelineError;
use crate::fetch::PageFetcher;
use crate::models::job::{JobDetail, JobSummary};

/// Fetcher that serves pages from a fixed url-to-html map.
pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new<S: AsRef<str>>(pages: &[(&str, S)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.as_ref().to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| PipelineError::Navigation(format!("{url}: no fixture page")))
    }
}

/// In-memory board that records submissions and can be told to fail.
#[derive(Default)]
pub struct StubBoard {
    pub references: HashSet<String>,
    pub fail: HashSet<String>,
    pub skills: Vec<Skill>,
    pub fail_parsing: bool,
    pub submitted: Mutex<Vec<IndexedJob>>,
    pub reference_calls: Mutex<usize>,
}

#[async_trait]
impl JobBoard for StubBoard {
    async fn existing_references(&self) -> Result<HashSet<String>, PipelineError> {
        *self.reference_calls.lock().unwrap() += 1;
        Ok(self.references.clone())
    }

    async fn parse_skills(&self, _text: &str) -> Result<Vec<Skill>, PipelineError> {
        if self.fail_parsing {
            return Err(PipelineError::Submission("parsing unavailable".to_string()));
        }
        Ok(self.skills.clone())
    }

    async fn submit(&self, job: &IndexedJob) -> Result<(), PipelineError> {
        if self.fail.contains(&job.job.reference) {
            return Err(PipelineError::Submission(format!(
                "{}: submission rejected",
                job.job.reference
            )));
        }
        self.submitted.lock().unwrap().push(job.clone());
        Ok(())
    }
}

pub fn board_config() -> BoardConfig {
    BoardConfig {
        api_key: "key".into(),
        user_email: "me@example.com".into(),
        board_key: "board-1".into(),
        endpoint: DEFAULT_ENDPOINT.to_string(),
    }
}

/// Capture date every sample record carries.
pub fn captured() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

pub fn sample_summary(n: u32) -> JobSummary {
    JobSummary {
        title: format!("Posting {n}"),
        company: format!("Company {n}"),
        location: "London".into(),
        summary: format!("Short blurb {n}."),
        url: format!("https://jobs.example.com/view?id={n}"),
        posted: "3 days ago".into(),
        captured_at: captured(),
    }
}

pub fn sample_detail(n: u32) -> JobDetail {
    JobDetail {
        summary: sample_summary(n),
        description: format!("Long description for posting {n}."),
        salary: "£300 - £400 a day - Contract".into(),
    }
}

/// Builder for one posting card on a fixture listing page.
pub struct PostingFixture {
    title: String,
    company: Option<String>,
    location: String,
    summary: String,
    href: String,
    posted: Option<String>,
}

pub fn posting(
    title: &str,
    company: &str,
    location: &str,
    summary: &str,
    href: &str,
) -> PostingFixture {
    PostingFixture {
        title: title.to_string(),
        company: Some(company.to_string()),
        location: location.to_string(),
        summary: summary.to_string(),
        href: href.to_string(),
        posted: None,
    }
}

impl PostingFixture {
    pub fn posted(mut self, text: &str) -> Self {
        self.posted = Some(text.to_string());
        self
    }

    pub fn no_company(mut self) -> Self {
        self.company = None;
        self
    }

    fn render(&self) -> String {
        let mut card = String::new();
        card.push_str("<div class=\"resultWithShelf\">");
        card.push_str(&format!(
            "<h2 class=\"jobTitle\"><a href=\"{}\">{}</a></h2>",
            self.href, self.title
        ));
        if let Some(company) = &self.company {
            card.push_str(&format!("<span class=\"companyName\">{company}</span>"));
        }
        card.push_str(&format!(
            "<div class=\"companyLocation\">{}</div>",
            self.location
        ));
        card.push_str(&format!("<div class=\"job-snippet\">{}</div>", self.summary));
        if let Some(posted) = &self.posted {
            card.push_str(&format!("<span class=\"date\">{posted}</span>"));
        }
        card.push_str("</div>");
        card
    }
}

pub fn listing_page(postings: &[PostingFixture], next_href: Option<&str>) -> String {
    let cards: String = postings.iter().map(PostingFixture::render).collect();
    let next = next_href
        .map(|href| format!("<a data-testid=\"pagination-page-next\" href=\"{href}\">Next</a>"))
        .unwrap_or_default();
    format!("<html><body><div id=\"results\">{cards}</div><nav>{next}</nav></body></html>")
}

pub fn detail_page(description: &str, salary: Option<&str>) -> String {
    let salary_line = salary
        .map(|text| format!("<div id=\"salaryInfoAndJobType\">{text}</div>"))
        .unwrap_or_default();
    format!(
        "<html><body>{salary_line}<div id=\"jobDescriptionText\"><p>{description}</p></div></body></html>"
    )
}
