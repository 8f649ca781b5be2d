use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::board::JobBoard;
use crate::board::payload::{Entity, IndexedJob, Skill, format_skills};
use crate::config::BoardConfig;
use crate::error::PipelineError;
use crate::fetch::{CONNECT_TIMEOUT, REQUEST_TIMEOUT};

/// Client for the Hrflow board API. Credentials travel as the
/// X-API-KEY and X-USER-EMAIL headers on every request.
pub struct HrflowClient {
    http: reqwest::Client,
    config: BoardConfig,
}

impl HrflowClient {
    pub fn new(config: BoardConfig) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| {
                PipelineError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;
        Ok(Self { http, config })
    }

    fn base(&self) -> &str {
        self.config.endpoint.trim_end_matches('/')
    }

    async fn get_json(&self, url: &str) -> Result<Value, PipelineError> {
        let resp = self
            .http
            .get(url)
            .header("X-API-KEY", &self.config.api_key)
            .header("X-USER-EMAIL", &self.config.user_email)
            .send()
            .await
            .map_err(|e| PipelineError::Submission(format!("Board request failed: {e}")))?;
        read_json(resp).await
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<Value, PipelineError> {
        let resp = self
            .http
            .post(url)
            .header("X-API-KEY", &self.config.api_key)
            .header("X-USER-EMAIL", &self.config.user_email)
            .json(body)
            .send()
            .await
            .map_err(|e| PipelineError::Submission(format!("Board request failed: {e}")))?;
        read_json(resp).await
    }
}

#[async_trait]
impl JobBoard for HrflowClient {
    async fn existing_references(&self) -> Result<HashSet<String>, PipelineError> {
        let url = format!(
            r#"{}/storing/jobs?board_keys=["{}"]"#,
            self.base(),
            self.config.board_key
        );
        let body = self.get_json(&url).await?;
        let references = parse_references(&body)?;
        debug!("Board already holds {} references", references.len());
        Ok(references)
    }

    async fn parse_skills(&self, text: &str) -> Result<Vec<Skill>, PipelineError> {
        let url = format!("{}/document/parsing", self.base());
        let body = self
            .post_json(&url, &serde_json::json!({ "text": text }))
            .await?;
        let entities = parse_entities(&body)?;
        Ok(format_skills(text, &entities))
    }

    async fn submit(&self, job: &IndexedJob) -> Result<(), PipelineError> {
        let url = format!("{}/job/indexing", self.base());
        self.post_json(&url, job).await?;
        debug!("Indexed {}", job.job.reference);
        Ok(())
    }
}

async fn read_json(resp: reqwest::Response) -> Result<Value, PipelineError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(PipelineError::Submission(format!("Board returned {status}")));
    }
    resp.json()
        .await
        .map_err(|e| PipelineError::Submission(format!("Failed to parse board response: {e}")))
}

/// Pull the reference set out of a storing response. Jobs stored
/// without a reference are skipped.
fn parse_references(body: &Value) -> Result<HashSet<String>, PipelineError> {
    let jobs = body.get("data").and_then(|v| v.as_array()).ok_or_else(|| {
        PipelineError::Submission("Missing 'data' in storing response".to_string())
    })?;
    Ok(jobs
        .iter()
        .filter_map(|job| job.get("reference").and_then(|v| v.as_str()))
        .map(String::from)
        .collect())
}

/// Pull the labelled entity list out of a document-parsing response.
fn parse_entities(body: &Value) -> Result<Vec<Entity>, PipelineError> {
    let ents = body
        .get("data")
        .and_then(|v| v.get("ents"))
        .cloned()
        .ok_or_else(|| {
            PipelineError::Submission("Missing 'data.ents' in parsing response".to_string())
        })?;
    serde_json::from_value(ents)
        .map_err(|e| PipelineError::Submission(format!("Malformed parsing entities: {e}")))
}
