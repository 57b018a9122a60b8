//! Bounded queue and worker pool for background review processing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info, warn};

use dishdive_core::{Error, Result, WorkerSettings};

use crate::board::JobBoard;
use crate::pipeline::ReviewPipeline;
use crate::types::ReviewJob;

/// Sending half of the review queue.
#[derive(Clone)]
pub struct ReviewQueue {
    tx: mpsc::Sender<ReviewJob>,
}

impl ReviewQueue {
    /// Wait for queue space, then hand the job to the workers.
    pub async fn enqueue(&self, job: ReviewJob) -> Result<()> {
        self.tx
            .send(job)
            .await
            .map_err(|_| Error::Internal("review worker is not running".into()))
    }
}

/// Spawn the dispatcher. Jobs run concurrently up to the configured limit,
/// each under the whole-task timeout.
pub fn start_review_worker(
    pipeline: Arc<ReviewPipeline>,
    board: Arc<JobBoard>,
    settings: &WorkerSettings,
) -> ReviewQueue {
    let (tx, mut rx) = mpsc::channel::<ReviewJob>(settings.queue_capacity.max(1));
    let permits = Arc::new(Semaphore::new(settings.max_concurrency.max(1)));
    let task_timeout = settings.task_timeout();

    info!(
        "Review worker started: concurrency={}, queue={}, task_timeout={}s",
        settings.max_concurrency, settings.queue_capacity, settings.task_timeout_secs
    );

    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            let permit = match permits.clone().acquire_owned().await {
                Ok(p) => p,
                Err(_) => break,
            };
            let pipeline = pipeline.clone();
            let board = board.clone();
            tokio::spawn(async move {
                let _permit = permit;
                run_job(&pipeline, &board, job, task_timeout).await;
            });
        }
        info!("Review worker stopped");
    });

    ReviewQueue { tx }
}

async fn run_job(pipeline: &ReviewPipeline, board: &JobBoard, job: ReviewJob, task_timeout: Duration) {
    let key = job.key();
    match tokio::time::timeout(task_timeout, pipeline.process(&job, board)).await {
        Ok(Ok(report)) => {
            info!(
                "Review {} processed: keywords_created={}, links_created={}",
                job.source_id, report.keywords_created, report.links_created
            );
        }
        Ok(Err(e)) => {
            error!("Review {} failed: {}", job.source_id, e);
            board.fail(key, e.to_string());
        }
        Err(_) => {
            let e = Error::Timeout(task_timeout.as_secs());
            warn!("Review {} timed out after {}s", job.source_id, task_timeout.as_secs());
            board.fail(key, e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{fixture, pipeline, FixedModel, MODEL_REPLY};
    use crate::types::JobState;
    use dishdive_store::SourceType;

    fn job(source_id: i64, dish: i64, res: i64) -> ReviewJob {
        ReviewJob {
            source_id,
            source_type: SourceType::User,
            dish_id: dish,
            restaurant_id: res,
            restaurant_name: "Jeh O".into(),
            review_text: "มาม่าต้มยำ อร่อย".into(),
            dish_hint: None,
            known_cuisine: None,
            known_restriction: None,
        }
    }

    async fn wait_finished(board: &JobBoard, key: crate::types::JobKey) -> JobState {
        for _ in 0..200 {
            if let Some(r) = board.get(key) {
                if r.state.is_finished() {
                    return r.state;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("job {:?} did not finish", key);
    }

    #[tokio::test]
    async fn test_jobs_run_to_normalized() {
        let f = fixture();
        let board = Arc::new(JobBoard::default());
        let queue = start_review_worker(
            Arc::new(pipeline(&f.store, FixedModel(Some(MODEL_REPLY)))),
            board.clone(),
            &WorkerSettings::default(),
        );
        for id in [1, 2, 3] {
            let j = job(id, f.dish, f.res);
            board.queued(j.key());
            queue.enqueue(j).await.unwrap();
        }
        for id in [1, 2, 3] {
            assert_eq!(wait_finished(&board, (SourceType::User, id)).await, JobState::Normalized);
        }
        assert_eq!(f.store.review_counts(f.dish).unwrap(), (3, 3, 3));
    }

    #[tokio::test]
    async fn test_task_timeout_marks_failed() {
        let f = fixture();
        let board = Arc::new(JobBoard::default());
        let settings = WorkerSettings {
            task_timeout_secs: 1,
            ..WorkerSettings::default()
        };
        let queue = start_review_worker(
            Arc::new(pipeline(&f.store, FixedModel(None))),
            board.clone(),
            &settings,
        );
        let j = job(7, f.dish, f.res);
        board.queued(j.key());
        queue.enqueue(j).await.unwrap();

        assert_eq!(wait_finished(&board, (SourceType::User, 7)).await, JobState::Failed);
        let record = board.get((SourceType::User, 7)).unwrap();
        assert!(record.error.unwrap().contains("timed out"));
    }
}
