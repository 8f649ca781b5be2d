use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::job::JobDetail;

static COMPENSATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"£\d+(?:,\d{3})*(?:\.\d{2})? - £\d+(?:,\d{3})*(?:\.\d{2})? (?:a day|a week|a month|a year)",
    )
    .expect("valid compensation pattern")
});

static EMPLOYMENT_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Full-time|Part-time|Internship|Apprenticeship|Contract|Temporary")
        .expect("valid employment type pattern")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub text: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub title: String,
    pub description: String,
}

/// Job fields in the shape the board's indexing endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardJob {
    pub name: String,
    pub agent_key: Option<String>,
    pub reference: String,
    pub url: String,
    pub created_at: NaiveDate,
    pub updated_at: Option<String>,
    pub summary: String,
    pub location: Location,
    pub sections: Vec<Section>,
    pub skills: Vec<Skill>,
    pub languages: Vec<serde_json::Value>,
    pub tags: Vec<Tag>,
    pub ranges_date: Vec<serde_json::Value>,
    pub ranges_float: Vec<serde_json::Value>,
    pub metadatas: Vec<serde_json::Value>,
}

/// A board job together with the board it is destined for. Serializes
/// with `board_key` alongside the job fields, as the indexing endpoint
/// takes them in one flat object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedJob {
    pub board_key: String,
    #[serde(flatten)]
    pub job: BoardJob,
}

impl IndexedJob {
    /// Shape an enriched record for indexing. The posting url doubles
    /// as the board reference, and the salary line is mined for
    /// compensation and employment-type tags.
    pub fn from_detail(detail: &JobDetail, board_key: &str) -> Self {
        let (compensation, employment_type) = mine_salary(&detail.salary);
        let mut tags = Vec::new();
        if let Some(value) = compensation {
            tags.push(Tag {
                name: "compensation".into(),
                value,
            });
        }
        if let Some(value) = employment_type {
            tags.push(Tag {
                name: "employment_type".into(),
                value,
            });
        }

        Self {
            board_key: board_key.to_string(),
            job: BoardJob {
                name: detail.summary.title.clone(),
                agent_key: None,
                reference: detail.summary.url.clone(),
                url: detail.summary.url.clone(),
                created_at: resolve_posted_date(
                    &detail.summary.posted,
                    detail.summary.captured_at,
                ),
                updated_at: None,
                summary: detail.summary.summary.clone(),
                location: Location {
                    text: detail.summary.location.clone(),
                    lat: None,
                    lng: None,
                },
                sections: vec![Section {
                    name: "description".into(),
                    title: "Description".into(),
                    description: detail.description.clone(),
                }],
                skills: Vec::new(),
                languages: Vec::new(),
                tags,
                ranges_date: Vec::new(),
                ranges_float: Vec::new(),
                metadatas: Vec::new(),
            },
        }
    }
}

/// Pull the compensation band and the employment type out of a
/// free-text salary line. Either part may be absent.
pub fn mine_salary(salary: &str) -> (Option<String>, Option<String>) {
    let compensation = COMPENSATION.find(salary).map(|m| m.as_str().to_string());
    let employment_type = EMPLOYMENT_TYPE.find(salary).map(|m| m.as_str().to_string());
    (compensation, employment_type)
}

/// Resolve a relative posting age like "3 days ago" against the date
/// the record was captured. Ages in hours or minutes round to the
/// capture date; an age that cannot be read, or that lands outside the
/// calendar, falls back to it too.
pub fn resolve_posted_date(posted: &str, captured_at: NaiveDate) -> NaiveDate {
    let tokens: Vec<&str> = posted.split_whitespace().collect();
    let has = |singular: &str, plural: &str| tokens.iter().any(|t| *t == singular || *t == plural);

    let days_ago = if has("day", "days") {
        first_number(&tokens).map(i64::from)
    } else if has("hour", "hours") || has("minute", "minutes") {
        Some(0)
    } else if has("month", "months") {
        first_number(&tokens).map(|n| i64::from(n) * 30)
    } else if has("year", "years") {
        first_number(&tokens).map(|n| i64::from(n) * 365)
    } else {
        None
    };

    match days_ago {
        Some(days) => captured_at
            .checked_sub_signed(Duration::days(days))
            .unwrap_or_else(|| {
                debug!("Posting age '{posted}' is out of calendar range, using capture date");
                captured_at
            }),
        None => {
            debug!("Unreadable posting age '{posted}', using capture date");
            captured_at
        }
    }
}

/// Leading digits of the first token that has any, so "30+" reads as 30.
fn first_number(tokens: &[&str]) -> Option<u32> {
    tokens.iter().find_map(|token| {
        let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    })
}

/// One span the board's document parser labelled in a description.
#[derive(Debug, Clone, Deserialize)]
pub struct Entity {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

/// Turn parser entities into board skills. Entity offsets count
/// characters in the parsed text; only `skill_*` labels count, names
/// are lowercased, and a repeated name keeps its first entry.
pub fn format_skills(text: &str, entities: &[Entity]) -> Vec<Skill> {
    let mut seen = HashSet::new();
    let mut skills = Vec::new();
    for entity in entities {
        if !entity.label.starts_with("skill") {
            continue;
        }
        let Some(span) = char_span(text, entity.start, entity.end) else {
            continue;
        };
        let name = span.to_lowercase();
        if !seen.insert(name.clone()) {
            continue;
        }
        let kind = if entity.label == "skill_hard" {
            "hard"
        } else {
            "soft"
        };
        skills.push(Skill {
            name,
            value: None,
            kind: kind.to_string(),
        });
    }
    skills
}

/// Slice by character offsets. Spans that reach outside the text
/// yield `None`.
fn char_span(text: &str, start: usize, end: usize) -> Option<String> {
    if end <= start {
        return None;
    }
    let span: String = text.chars().skip(start).take(end - start).collect();
    if span.chars().count() == end - start {
        Some(span)
    } else {
        None
    }
}
