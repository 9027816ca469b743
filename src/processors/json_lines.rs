//! Append-only JSON Lines emission processor

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{AuditError, Result};
use crate::event::Event;
use crate::processing::ProcessingObjects;
use crate::processor::Processor;
use crate::properties::CommonProperties;

/// Pass-through property key naming the output file
pub const PATH_KEY: &str = "json_lines.path";

/// Appends each audit event's JSON document to a file, one per line
///
/// The target path comes from the `json_lines.path` pass-through
/// property. Writes are flushed per event so a crash loses at most the
/// event being written. An append to a shared log cannot be compensated,
/// so this processor is not reversible.
pub struct JsonLinesProcessor {
    path: PathBuf,
    writer: Option<Mutex<BufWriter<File>>>,
}

impl JsonLinesProcessor {
    pub fn new() -> Self {
        Self {
            path: PathBuf::new(),
            writer: None,
        }
    }

    /// Path of the output file (empty before init)
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonLinesProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for JsonLinesProcessor {
    fn name(&self) -> &str {
        "json-lines"
    }

    fn init(&mut self, properties: &CommonProperties) -> Result<()> {
        let path = properties.extra(PATH_KEY).ok_or_else(|| {
            AuditError::configuration(format!(
                "json-lines processor requires the '{}' property",
                PATH_KEY
            ))
        })?;
        let path = PathBuf::from(path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        self.writer = Some(Mutex::new(BufWriter::new(file)));
        self.path = path;
        Ok(())
    }

    fn process(
        &self,
        event: &mut Event,
        stream: &str,
        _objects: &ProcessingObjects,
    ) -> Result<()> {
        let writer = self.writer.as_ref().ok_or_else(|| {
            AuditError::not_initialized("json-lines processor used before init")
        })?;

        let json = event.to_json()?;
        let mut writer = writer.lock().unwrap();
        writeln!(writer, "{}", json)?;
        writer.flush()?;
        tracing::trace!(stream, path = %self.path.display(), "audit event appended");
        Ok(())
    }

    fn clean_up(&self) {
        if let Some(writer) = &self.writer {
            if let Err(err) = writer.lock().unwrap().flush() {
                tracing::warn!(path = %self.path.display(), error = %err, "final flush failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use tempfile::TempDir;

    fn initialized(path: &Path) -> JsonLinesProcessor {
        let mut processor = JsonLinesProcessor::new();
        let props =
            CommonProperties::new().with_extra(PATH_KEY, path.to_string_lossy().to_string());
        processor.init(&props).unwrap();
        processor
    }

    #[test]
    fn test_init_requires_path_property() {
        let mut processor = JsonLinesProcessor::new();
        let err = processor.init(&CommonProperties::default()).unwrap_err();
        assert!(matches!(err, AuditError::Configuration(_)));
        assert!(err.to_string().contains(PATH_KEY));
    }

    #[test]
    fn test_appends_one_line_per_event() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.jsonl");
        let processor = initialized(&path);
        let objects = ProcessingObjects::new();

        for actor in ["alice", "bob"] {
            let mut event = Event::new();
            event.set_field(Field::new("actor", actor.as_bytes().to_vec()).unwrap());
            processor.process(&mut event, "default", &objects).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let restored = Event::from_json(lines[0]).unwrap();
        assert_eq!(restored.get_field("actor").unwrap().char_value().unwrap(), "alice");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("audit.jsonl");
        let processor = initialized(&path);

        let mut event = Event::new();
        let objects = ProcessingObjects::new();
        processor.process(&mut event, "default", &objects).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_process_before_init_fails() {
        let processor = JsonLinesProcessor::new();
        let mut event = Event::new();
        let objects = ProcessingObjects::new();

        let err = processor.process(&mut event, "default", &objects).unwrap_err();
        assert!(matches!(err, AuditError::NotInitialized(_)));
    }

    #[test]
    fn test_not_reversible() {
        let processor = JsonLinesProcessor::new();
        assert!(processor.as_reversible().is_none());
    }
}
