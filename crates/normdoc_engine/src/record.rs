use std::path::{Path, PathBuf};

use serde_json::json;

use normdoc_core::Card;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes one structured record per saved card.
///
/// The field-to-tag mapping is fixed; implementations only choose the
/// storage medium.
pub trait RecordSink: Send + Sync {
    fn emit(&self, run_name: &str, unit_id: &str, card: &Card) -> Result<(), RecordError>;
}

/// File-backed sink: one JSON document per card under
/// `{root}/{run_name}/{unit_id}.json`, written atomically.
pub struct JsonRecordWriter {
    writer: AtomicFileWriter,
}

impl JsonRecordWriter {
    pub fn new(root: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(root),
        }
    }
}

impl RecordSink for JsonRecordWriter {
    fn emit(&self, run_name: &str, unit_id: &str, card: &Card) -> Result<(), RecordError> {
        let mut record = json!({
            "title": card.title,
            "link": card.link,
            "category": card.category,
            "number": card.identifier,
            "date": card.effective_date,
            "main": card.related_rule,
            "organization": card.issuing_bodies.iter().collect::<Vec<_>>(),
        });
        if let Some(content) = card.attachment_content.as_deref() {
            record["attachment"] = json!({
                "filename": card.filename,
                "extension": card.extension,
                "size": card.attachment_size,
                "content": content,
            });
        }
        let body = serde_json::to_vec_pretty(&record)?;
        let relative = Path::new(run_name).join(format!("{unit_id}.json"));
        self.writer.write(&relative, &body)?;
        Ok(())
    }
}
