use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::progress::ProgressBoard;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Run finalization collaborator; the pipeline invokes `finalize` exactly
/// once per run, on both the normal and the abort path.
pub trait Archiver: Send + Sync {
    fn finalize(&self, run_name: &str) -> Result<(), ArchiveError>;
}

/// Writes a closing manifest with the run's counter snapshot next to the
/// emitted records.
pub struct ManifestArchiver {
    writer: AtomicFileWriter,
    board: Arc<ProgressBoard>,
}

impl ManifestArchiver {
    pub fn new(root: PathBuf, board: Arc<ProgressBoard>) -> Self {
        Self {
            writer: AtomicFileWriter::new(root),
            board,
        }
    }
}

impl Archiver for ManifestArchiver {
    fn finalize(&self, run_name: &str) -> Result<(), ArchiveError> {
        let manifest = json!({
            "run": run_name,
            "finished_utc": chrono::Utc::now().to_rfc3339(),
            "counters": self.board.snapshot(run_name),
        });
        let body = serde_json::to_vec_pretty(&manifest)?;
        let relative = Path::new(run_name).join("manifest.json");
        self.writer.write(&relative, &body)?;
        Ok(())
    }
}
