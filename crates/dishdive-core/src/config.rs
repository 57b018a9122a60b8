//! Configuration and data directory management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Paths to all DishDive data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// SQLite database directory (`data/db/`).
    pub db: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
    /// English label → Thai keyword fragment mapping.
    pub keyword_mapping_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    ///
    /// The keyword mapping lives outside the data directory by default
    /// (`config/keyword_mapping.json`); `KEYWORD_MAPPING_PATH` overrides it.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let keyword_mapping_file = std::env::var("KEYWORD_MAPPING_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config").join("keyword_mapping.json"));
        let paths = Self {
            db: root.join("db"),
            llm_config_file: root.join("llm-config.json"),
            keyword_mapping_file,
            root,
        };
        std::fs::create_dir_all(&paths.db)?;
        Ok(paths)
    }
}

/// Background worker limits for review processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSettings {
    /// Bound on a single extraction-model call, in seconds.
    pub extract_timeout_secs: u64,
    /// Maximum number of review tasks running at once.
    pub max_concurrency: usize,
    /// Capacity of the pending task queue.
    pub queue_capacity: usize,
    /// Bound on one whole extract → normalize → recompute task, in seconds.
    pub task_timeout_secs: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            extract_timeout_secs: 30,
            max_concurrency: 4,
            queue_capacity: 256,
            task_timeout_secs: 120,
        }
    }
}

/// Slack kept between the model bound and the whole-task bound so the
/// rule-based fallback and normalization still fit after a model timeout.
pub const TASK_TIMEOUT_HEADROOM_SECS: u64 = 10;

impl WorkerSettings {
    /// Raise the task timeout when it would fire before the model timeout
    /// plus [`TASK_TIMEOUT_HEADROOM_SECS`].
    pub fn clamped(mut self) -> Self {
        let floor = self.extract_timeout_secs.saturating_add(TASK_TIMEOUT_HEADROOM_SECS);
        if self.task_timeout_secs < floor {
            warn!(
                "Task timeout {}s is below extract timeout {}s plus headroom; using {}s",
                self.task_timeout_secs, self.extract_timeout_secs, floor
            );
            self.task_timeout_secs = floor;
        }
        self
    }

    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }

    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }
}

/// Top-level DishDive configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishDiveConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Review worker limits.
    pub workers: WorkerSettings,
}

impl DishDiveConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let defaults = WorkerSettings::default();
        let workers = WorkerSettings {
            extract_timeout_secs: env_or("DISHDIVE_EXTRACT_TIMEOUT_SECS", defaults.extract_timeout_secs),
            max_concurrency: env_or("DISHDIVE_WORKERS", defaults.max_concurrency).max(1),
            queue_capacity: env_or("DISHDIVE_QUEUE_CAPACITY", defaults.queue_capacity).max(1),
            task_timeout_secs: env_or("DISHDIVE_TASK_TIMEOUT_SECS", defaults.task_timeout_secs),
        }
        .clamped();

        Ok(Self {
            port: env_or("PORT", 3003),
            data_paths: DataPaths::new(data_dir)?,
            workers,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}
