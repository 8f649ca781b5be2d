use std::path::PathBuf;

use clap::Parser;

use crate::error::PipelineError;

/// Default base url of the Hrflow board API.
pub const DEFAULT_ENDPOINT: &str = "https://api.hrflow.ai/v1";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "jobfeed",
    about = "Job posting scraper and board indexing pipeline"
)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Crawl listing pages and write posting summaries
    Scrape {
        /// Listing url to start crawling from
        #[arg(long)]
        url: String,

        /// Stop after this many listing pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// Output file, one summary per line
        #[arg(long, default_value = "summaries.jsonl")]
        out: PathBuf,
    },
    /// Visit each posting's page and add description and salary
    Enrich {
        /// Summaries file written by the scrape stage
        #[arg(long, default_value = "summaries.jsonl")]
        input: PathBuf,

        /// Output file, one enriched posting per line
        #[arg(long, default_value = "details.jsonl")]
        out: PathBuf,
    },
    /// Push enriched postings to the job board
    Index {
        /// Details file written by the enrich stage
        #[arg(long, default_value = "details.jsonl")]
        input: PathBuf,

        #[command(flatten)]
        board: BoardArgs,
    },
    /// Run scrape, enrich and index back to back
    Run {
        /// Listing url to start crawling from
        #[arg(long)]
        url: String,

        /// Stop after this many listing pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// Intermediate summaries file
        #[arg(long, default_value = "summaries.jsonl")]
        summaries: PathBuf,

        /// Intermediate details file
        #[arg(long, default_value = "details.jsonl")]
        details: PathBuf,

        #[command(flatten)]
        board: BoardArgs,
    },
}

/// Board credentials and destination, from flags or the environment.
#[derive(clap::Args, Debug, Clone)]
pub struct BoardArgs {
    /// Api key for the board
    #[arg(long, env = "JOBFEED_API_KEY")]
    pub api_key: Option<String>,

    /// Account email sent alongside the api key
    #[arg(long, env = "JOBFEED_USER_EMAIL")]
    pub user_email: Option<String>,

    /// Board to index into
    #[arg(long, env = "JOBFEED_BOARD_KEY")]
    pub board_key: Option<String>,

    /// Base url of the board API
    #[arg(long, env = "JOBFEED_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Abort the run on the first failed submission
    #[arg(long, env = "JOBFEED_HALT_ON_FAILURE", default_value = "false")]
    pub halt_on_failure: bool,
}

/// Validated board settings. Construction fails on the first missing
/// credential so no stage starts half-configured.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub api_key: String,
    pub user_email: String,
    pub board_key: String,
    pub endpoint: String,
}

impl BoardConfig {
    pub fn from_args(args: &BoardArgs) -> Result<Self, PipelineError> {
        let Some(api_key) = args.api_key.clone() else {
            return Err(missing("api key", "--api-key", "JOBFEED_API_KEY"));
        };
        let Some(user_email) = args.user_email.clone() else {
            return Err(missing("user email", "--user-email", "JOBFEED_USER_EMAIL"));
        };
        let Some(board_key) = args.board_key.clone() else {
            return Err(missing("board key", "--board-key", "JOBFEED_BOARD_KEY"));
        };
        Ok(Self {
            api_key,
            user_email,
            board_key,
            endpoint: args.endpoint.clone(),
        })
    }
}

fn missing(what: &str, flag: &str, env: &str) -> PipelineError {
    PipelineError::Configuration(format!("Missing {what} ({flag} or {env})"))
}
