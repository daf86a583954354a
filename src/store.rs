//! File-backed persistence for conception records and training history.
//!
//! Conception records are single pretty-printed JSON documents, one file per
//! embryo (`conception_<id>.json`). Training history is append-only JSONL,
//! one file per (embryo, program) pair (`training_<id>_<program>.jsonl`),
//! so repeated runs of the same program accumulate instead of overwriting.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::conception::ConceptionRecord;
use crate::error::{EmbryoError, Result};
use crate::training::TrainingRecord;

/// Storage seam for conception records.
pub trait ConceptionStore {
    fn save(&self, record: &ConceptionRecord) -> Result<()>;
    /// Load a record by embryo id. `Ok(None)` means no record exists;
    /// a present but unreadable record is an error.
    fn load(&self, embryo_id: &str) -> Result<Option<ConceptionRecord>>;
}

/// Storage seam for training history.
pub trait TrainingStore {
    fn append(&self, record: &TrainingRecord) -> Result<()>;
    fn load(&self, embryo_id: &str, program: &str) -> Result<Vec<TrainingRecord>>;
}

/// One `conception_<id>.json` file per embryo under a data directory.
pub struct FileConceptionStore {
    dir: PathBuf,
}

impl FileConceptionStore {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn record_path(&self, embryo_id: &str) -> PathBuf {
        self.dir.join(format!("conception_{}.json", embryo_id))
    }
}

impl ConceptionStore for FileConceptionStore {
    fn save(&self, record: &ConceptionRecord) -> Result<()> {
        let path = self.record_path(&record.embryo_id);
        let data = serde_json::to_string_pretty(record).map_err(|e| {
            EmbryoError::MalformedRecord {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;
        fs::write(&path, data)?;
        debug!(embryo_id = %record.embryo_id, path = %path.display(), "conception record saved");
        Ok(())
    }

    fn load(&self, embryo_id: &str) -> Result<Option<ConceptionRecord>> {
        let path = self.record_path(embryo_id);
        let data = match fs::read_to_string(&path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: ConceptionRecord =
            serde_json::from_str(&data).map_err(|e| EmbryoError::MalformedRecord {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        record
            .validate()
            .map_err(|reason| EmbryoError::MalformedRecord {
                path: path.clone(),
                reason,
            })?;
        Ok(Some(record))
    }
}

/// One `training_<id>_<program>.jsonl` file per (embryo, program) pair.
///
/// All mutations append — nothing is overwritten.
pub struct FileTrainingStore {
    dir: PathBuf,
}

impl FileTrainingStore {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn log_path(&self, embryo_id: &str, program: &str) -> PathBuf {
        self.dir
            .join(format!("training_{}_{}.jsonl", embryo_id, program))
    }
}

impl TrainingStore for FileTrainingStore {
    fn append(&self, record: &TrainingRecord) -> Result<()> {
        let path = self.log_path(&record.embryo_id, &record.program);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let line =
            serde_json::to_string(record).map_err(|e| EmbryoError::MalformedRecord {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        writeln!(file, "{}", line)?;
        debug!(
            embryo_id = %record.embryo_id,
            program = %record.program,
            path = %path.display(),
            "training record appended"
        );
        Ok(())
    }

    fn load(&self, embryo_id: &str, program: &str) -> Result<Vec<TrainingRecord>> {
        let path = self.log_path(embryo_id, program);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record: TrainingRecord =
                serde_json::from_str(trimmed).map_err(|e| EmbryoError::MalformedRecord {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            records.push(record);
        }
        Ok(records)
    }
}
