// Scraping stages: the listing crawl and the detail-page enrichment.
// Field extraction is pure over parsed HTML so it tests against fixtures
// without a live site.

pub mod detail;
pub mod listing;

use scraper::{ElementRef, Selector};

use crate::error::PipelineError;

/// CSS selectors describing one listing site. The defaults target the
/// board this pipeline was built against; test fixtures reuse the same
/// class names.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub posting: &'static str,
    pub title: &'static str,
    pub company: &'static str,
    pub location: &'static str,
    pub summary: &'static str,
    pub posted: &'static str,
    pub link: &'static str,
    pub next_page: &'static str,
    pub description: &'static str,
    pub salary: &'static str,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            posting: ".resultWithShelf",
            title: ".jobTitle",
            company: ".companyName",
            location: ".companyLocation",
            summary: ".job-snippet",
            posted: ".date",
            link: "a",
            next_page: r#"a[data-testid="pagination-page-next"]"#,
            description: "#jobDescriptionText",
            salary: "#salaryInfoAndJobType",
        }
    }
}

/// Compiled selector set. Compilation failures surface once here instead
/// of inside the crawl loop.
#[derive(Debug)]
pub struct Selectors {
    pub posting: Selector,
    pub title: Selector,
    pub company: Selector,
    pub location: Selector,
    pub summary: Selector,
    pub posted: Selector,
    pub link: Selector,
    pub next_page: Selector,
    pub description: Selector,
    pub salary: Selector,
}

impl Selectors {
    pub fn compile(profile: &SiteProfile) -> Result<Self, PipelineError> {
        Ok(Self {
            posting: compile(profile.posting)?,
            title: compile(profile.title)?,
            company: compile(profile.company)?,
            location: compile(profile.location)?,
            summary: compile(profile.summary)?,
            posted: compile(profile.posted)?,
            link: compile(profile.link)?,
            next_page: compile(profile.next_page)?,
            description: compile(profile.description)?,
            salary: compile(profile.salary)?,
        })
    }
}

fn compile(css: &str) -> Result<Selector, PipelineError> {
    Selector::parse(css)
        .map_err(|e| PipelineError::Extraction(format!("invalid selector '{css}': {e}")))
}

/// Text of the first match under `scope`, whitespace-normalized.
/// `None` when the selector matches nothing or only empty text; callers
/// degrade that to an empty field.
pub fn extract_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = scope.select(selector).next()?;
    let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
    if text.is_empty() { None } else { Some(text) }
}

/// `href` of the first match under `scope`, as written in the markup.
pub fn extract_href(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(str::to_string)
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
