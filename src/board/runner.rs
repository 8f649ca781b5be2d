use tracing::{debug, info, warn};

use crate::board::JobBoard;
use crate::board::payload::IndexedJob;
use crate::config::BoardConfig;
use crate::error::PipelineError;
use crate::models::job::JobDetail;

/// Counts from one indexing run.
#[derive(Debug, Default, PartialEq)]
pub struct IndexReport {
    pub submitted: usize,
    pub already_indexed: usize,
    pub failed: usize,
}

/// Push enriched records to the board one at a time, in input order.
/// Records whose reference the board already holds are skipped. A
/// failed submission is logged and counted, and aborts the run only
/// when `halt_on_failure` is set.
pub async fn run_index(
    board: &dyn JobBoard,
    config: &BoardConfig,
    details: &[JobDetail],
    halt_on_failure: bool,
) -> Result<IndexReport, PipelineError> {
    let mut report = IndexReport::default();
    if details.is_empty() {
        info!("Nothing to index");
        return Ok(report);
    }

    let existing = board.existing_references().await?;

    for detail in details {
        if existing.contains(&detail.summary.url) {
            debug!("Already on board: {}", detail.summary.url);
            report.already_indexed += 1;
            continue;
        }

        let mut job = IndexedJob::from_detail(detail, &config.board_key);
        match board.parse_skills(&detail.description).await {
            Ok(skills) => job.job.skills = skills,
            Err(e) => warn!("Skill parsing failed for {}: {e}", detail.summary.url),
        }

        match board.submit(&job).await {
            Ok(()) => {
                info!("Indexed {}", detail.summary.url);
                report.submitted += 1;
            }
            Err(e) => {
                warn!("Failed to index {}: {e}", detail.summary.url);
                report.failed += 1;
                if halt_on_failure {
                    return Err(e);
                }
            }
        }
    }

    info!(
        "Indexing completed: {} submitted, {} already on board, {} failed",
        report.submitted, report.already_indexed, report.failed
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::payload::Skill;
    use crate::testing::{StubBoard, board_config, sample_detail};

    #[tokio::test]
    async fn submits_every_record_with_the_configured_board_key() {
        let board = StubBoard::default();
        let details = vec![sample_detail(1), sample_detail(2)];

        let report = run_index(&board, &board_config(), &details, false)
            .await
            .unwrap();

        assert_eq!(
            report,
            IndexReport {
                submitted: 2,
                already_indexed: 0,
                failed: 0
            }
        );
        let submitted = board.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[0].board_key, "board-1");
        assert_eq!(submitted[0].job.reference, details[0].summary.url);
        assert_eq!(submitted[1].job.reference, details[1].summary.url);
    }

    #[tokio::test]
    async fn records_already_on_board_are_skipped() {
        let details = vec![sample_detail(1), sample_detail(2)];
        let board = StubBoard {
            references: [details[0].summary.url.clone()].into(),
            ..Default::default()
        };

        let report = run_index(&board, &board_config(), &details, false)
            .await
            .unwrap();

        assert_eq!(report.submitted, 1);
        assert_eq!(report.already_indexed, 1);
        let submitted = board.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].job.reference, details[1].summary.url);
    }

    #[tokio::test]
    async fn a_failed_submission_does_not_stop_the_run() {
        let details = vec![sample_detail(1), sample_detail(2), sample_detail(3)];
        let board = StubBoard {
            fail: [details[1].summary.url.clone()].into(),
            ..Default::default()
        };

        let report = run_index(&board, &board_config(), &details, false)
            .await
            .unwrap();

        assert_eq!(report.submitted, 2);
        assert_eq!(report.failed, 1);
        let submitted = board.submitted.lock().unwrap();
        assert_eq!(submitted[0].job.reference, details[0].summary.url);
        assert_eq!(submitted[1].job.reference, details[2].summary.url);
    }

    #[tokio::test]
    async fn halt_on_failure_aborts_at_the_first_failure() {
        let details = vec![sample_detail(1), sample_detail(2), sample_detail(3)];
        let board = StubBoard {
            fail: [details[1].summary.url.clone()].into(),
            ..Default::default()
        };

        let err = run_index(&board, &board_config(), &details, true)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Submission(_)));
        let submitted = board.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].job.reference, details[0].summary.url);
    }

    #[tokio::test]
    async fn parsed_skills_attach_to_the_payload() {
        let board = StubBoard {
            skills: vec![Skill {
                name: "rust".into(),
                value: None,
                kind: "hard".into(),
            }],
            ..Default::default()
        };
        let details = vec![sample_detail(1)];

        run_index(&board, &board_config(), &details, false)
            .await
            .unwrap();

        let submitted = board.submitted.lock().unwrap();
        assert_eq!(submitted[0].job.skills.len(), 1);
        assert_eq!(submitted[0].job.skills[0].name, "rust");
    }

    #[tokio::test]
    async fn failed_skill_parsing_still_indexes_the_record() {
        let board = StubBoard {
            fail_parsing: true,
            ..Default::default()
        };
        let details = vec![sample_detail(1)];

        let report = run_index(&board, &board_config(), &details, false)
            .await
            .unwrap();

        assert_eq!(report.submitted, 1);
        let submitted = board.submitted.lock().unwrap();
        assert!(submitted[0].job.skills.is_empty());
    }

    #[tokio::test]
    async fn an_empty_input_makes_no_board_calls() {
        let board = StubBoard::default();

        let report = run_index(&board, &board_config(), &[], false).await.unwrap();

        assert_eq!(report, IndexReport::default());
        assert_eq!(*board.reference_calls.lock().unwrap(), 0);
    }
}
