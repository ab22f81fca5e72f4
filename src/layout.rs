//! Run directory layout
//!
//! A fresh run writes under `output/<YYYY-MM-DD_HH-MM-SS>`; a resumed run
//! reuses `common.resume_path`. The trainer expects this tree:
//!
//! ```text
//! <run>/
//! ├── checkpoints/
//! │   ├── last.pt
//! │   ├── epoch.pt
//! │   ├── optimizer.pt
//! │   ├── num_seen_episodes_test_dataset.pt
//! │   └── dataset/
//! └── media/
//!     ├── episodes/{train,test,imagination}/
//!     └── reconstructions/
//! ```

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::TrainConfig;
use crate::error::{Error, Result};
use crate::schedule::CheckpointMode;

/// Directory fresh runs are created under
pub const OUTPUT_ROOT: &str = "output";

/// Timestamp format of fresh run directories
pub const FOLDER_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub const AGENT_CHECKPOINT: &str = "last.pt";
pub const EPOCH_CHECKPOINT: &str = "epoch.pt";
pub const OPTIMIZER_CHECKPOINT: &str = "optimizer.pt";
pub const DATASET_CHECKPOINT: &str = "dataset";
pub const TEST_DATASET_COUNTER: &str = "num_seen_episodes_test_dataset.pt";

/// Copy of the checkpoint directory kept while a checkpoint is written
pub const STAGING_DIR: &str = "checkpoints_tmp";

/// Folder name for a fresh run started at `now`
pub fn folder_name(now: NaiveDateTime) -> String {
    now.format(FOLDER_FORMAT).to_string()
}

/// Episode directory with the number of most recent episodes it keeps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeDir {
    pub path: PathBuf,
    pub max_num_episodes: u32,
}

/// Resolved paths of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunLayout {
    pub base: PathBuf,
    pub resumed: bool,
    pub checkpoints: PathBuf,
    pub media: PathBuf,
    pub episodes: PathBuf,
    pub reconstructions: PathBuf,
    pub train_episodes: EpisodeDir,
    pub test_episodes: EpisodeDir,
    pub imagination_episodes: EpisodeDir,
}

impl RunLayout {
    /// Resolve the layout relative to the working directory
    pub fn resolve(config: &TrainConfig, now: NaiveDateTime) -> Result<Self> {
        Self::resolve_in(Path::new(OUTPUT_ROOT), config, now)
    }

    /// Resolve the layout with fresh runs placed under `output_root`
    pub fn resolve_in(output_root: &Path, config: &TrainConfig, now: NaiveDateTime) -> Result<Self> {
        let common = &config.common;
        let base = if common.resume {
            common
                .resume_path
                .clone()
                .filter(|path| !path.as_os_str().is_empty())
                .ok_or_else(|| Error::RunLayout {
                    message: "common.resume is set without common.resume_path".to_string(),
                    suggestion: "Point common.resume_path at the run directory to resume"
                        .to_string(),
                })?
        } else {
            output_root.join(folder_name(now))
        };

        let checkpoints = base.join("checkpoints");
        let media = base.join("media");
        let episodes = media.join("episodes");
        let reconstructions = media.join("reconstructions");

        Ok(Self {
            train_episodes: EpisodeDir {
                path: episodes.join("train"),
                max_num_episodes: config.collector_train.num_episodes_to_save,
            },
            test_episodes: EpisodeDir {
                path: episodes.join("test"),
                max_num_episodes: config.collector_test.num_episodes_to_save,
            },
            imagination_episodes: EpisodeDir {
                path: episodes.join("imagination"),
                max_num_episodes: config.evaluation_settings.actor_critic.num_episodes_to_save,
            },
            base,
            resumed: common.resume,
            checkpoints,
            media,
            episodes,
            reconstructions,
        })
    }

    /// Create the directory tree of a fresh run
    ///
    /// Resumed runs are left untouched and must already hold checkpoints.
    pub fn prepare(&self) -> Result<()> {
        if self.resumed {
            return self.verify_resumable();
        }

        for dir in [
            &self.base,
            &self.checkpoints,
            &self.media,
            &self.episodes,
            &self.reconstructions,
        ] {
            fs::create_dir_all(dir)
                .map_err(|e| Error::io(format!("creating {}", dir.display()), e))?;
        }
        tracing::info!(run_dir = %self.base.display(), "run directory created");
        Ok(())
    }

    /// Check that a resumed run directory holds a full checkpoint
    pub fn verify_resumable(&self) -> Result<()> {
        if !self.checkpoints.is_dir() {
            return Err(Error::RunLayout {
                message: format!("no checkpoint directory at {}", self.checkpoints.display()),
                suggestion: "Check common.resume_path or start a fresh run with common.resume=false"
                    .to_string(),
            });
        }
        for file in [EPOCH_CHECKPOINT, AGENT_CHECKPOINT, OPTIMIZER_CHECKPOINT] {
            let path = self.checkpoints.join(file);
            if !path.is_file() {
                return Err(Error::RunLayout {
                    message: format!("missing {}", path.display()),
                    suggestion: "Resuming needs a run checkpointed with common.do_checkpoint=true"
                        .to_string(),
                });
            }
        }
        tracing::debug!(run_dir = %self.base.display(), "resumable checkpoint found");
        Ok(())
    }

    /// Temporary copy location used while a checkpoint is being written
    pub fn staging_dir(&self) -> PathBuf {
        self.base.join(STAGING_DIR)
    }

    /// Files and directories a checkpoint of `mode` writes
    pub fn checkpoint_files(&self, mode: CheckpointMode, with_evaluation: bool) -> Vec<PathBuf> {
        let mut files = vec![self.checkpoints.join(AGENT_CHECKPOINT)];
        if mode == CheckpointMode::Full {
            files.push(self.checkpoints.join(EPOCH_CHECKPOINT));
            files.push(self.checkpoints.join(OPTIMIZER_CHECKPOINT));
            files.push(self.checkpoints.join(DATASET_CHECKPOINT));
            if with_evaluation {
                files.push(self.checkpoints.join(TEST_DATASET_COUNTER));
            }
        }
        files
    }
}
