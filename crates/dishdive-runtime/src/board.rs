//! In-memory job state per review.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::types::{JobKey, JobRecord, JobState};

/// Finished jobs kept before the oldest are pruned.
pub const RETAINED_JOBS: usize = 500;

pub struct JobBoard {
    inner: RwLock<Inner>,
    retain: usize,
}

#[derive(Default)]
struct Inner {
    jobs: HashMap<JobKey, JobRecord>,
    next_seq: u64,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl Default for JobBoard {
    fn default() -> Self {
        Self::with_retain(RETAINED_JOBS)
    }
}

impl JobBoard {
    pub fn with_retain(retain: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            retain,
        }
    }

    pub fn queued(&self, key: JobKey) {
        let now = now_millis();
        self.inner.write().jobs.insert(
            key,
            JobRecord {
                state: JobState::Pending,
                error: None,
                queued_at: now,
                updated_at: now,
                finished_seq: None,
            },
        );
    }

    pub fn advance(&self, key: JobKey, state: JobState) {
        self.update(key, state, None);
    }

    pub fn fail(&self, key: JobKey, error: impl Into<String>) {
        self.update(key, JobState::Failed, Some(error.into()));
    }

    pub fn get(&self, key: JobKey) -> Option<JobRecord> {
        self.inner.read().jobs.get(&key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn update(&self, key: JobKey, state: JobState, error: Option<String>) {
        let now = now_millis();
        let mut inner = self.inner.write();
        let seq = inner.next_seq;
        let record = inner.jobs.entry(key).or_insert_with(|| JobRecord {
            state,
            error: None,
            queued_at: now,
            updated_at: now,
            finished_seq: None,
        });
        record.state = state;
        record.error = error;
        record.updated_at = now;
        if state.is_finished() {
            record.finished_seq = Some(seq);
            inner.next_seq += 1;
            Self::prune(&mut inner, self.retain);
        }
    }

    fn prune(inner: &mut Inner, retain: usize) {
        let mut finished: Vec<(JobKey, u64)> = inner
            .jobs
            .iter()
            .filter_map(|(k, r)| r.finished_seq.map(|s| (*k, s)))
            .collect();
        if finished.len() <= retain {
            return;
        }
        finished.sort_by_key(|(_, s)| *s);
        let excess = finished.len() - retain;
        for (key, _) in finished.into_iter().take(excess) {
            inner.jobs.remove(&key);
        }
        debug!("Pruned {} finished review jobs", excess);
    }
}
