#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Submission error: {0}")]
    Submission(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
