// Board module - the indexing side of the pipeline.
// Defines the trait a destination job board must implement and the
// runner that pushes enriched records through it.

pub mod hrflow;
pub mod payload;
pub mod runner;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::board::payload::{IndexedJob, Skill};
use crate::error::PipelineError;

/// Trait for a job board that accepts indexed postings.
#[async_trait]
pub trait JobBoard: Send + Sync {
    /// References of every job the board already holds, used to skip
    /// records that were indexed by an earlier run.
    async fn existing_references(&self) -> Result<HashSet<String>, PipelineError>;

    /// Extract skill entities from free text. Boards without a parsing
    /// endpoint keep the default and index jobs without skills.
    async fn parse_skills(&self, _text: &str) -> Result<Vec<Skill>, PipelineError> {
        Ok(Vec::new())
    }

    /// Push a single job to the board.
    async fn submit(&self, job: &IndexedJob) -> Result<(), PipelineError>;
}
