use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One posting as seen on a listing page. `url` is the join key that
/// links a record across all three pipeline stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub title: String,
    pub company: String,
    pub location: String,
    pub summary: String,
    pub url: String,
    /// Relative posted-age text from the listing ("3 days ago"); may be empty.
    pub posted: String,
    /// Date the record was scraped; anchors posted-age resolution.
    pub captured_at: NaiveDate,
}

/// A summary enriched from its detail page. Flattened so the on-disk
/// record stays a single flat object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub summary: JobSummary,
    pub description: String,
    pub salary: String,
}
