//! Structured-log emission processor

use crate::error::{AuditError, Result};
use crate::event::Event;
use crate::processing::ProcessingObjects;
use crate::processor::Processor;
use crate::properties::CommonProperties;

/// Emits each audit event through `tracing` at info level
///
/// A log line has no undoable side effect, so this processor is not
/// reversible and is skipped during rollback.
pub struct LogProcessor {
    initialized: bool,
}

impl LogProcessor {
    pub fn new() -> Self {
        Self { initialized: false }
    }
}

impl Default for LogProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for LogProcessor {
    fn name(&self) -> &str {
        "log"
    }

    fn init(&mut self, _properties: &CommonProperties) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn process(
        &self,
        event: &mut Event,
        stream: &str,
        _objects: &ProcessingObjects,
    ) -> Result<()> {
        if !self.initialized {
            return Err(AuditError::not_initialized("log processor used before init"));
        }
        let json = event.to_json()?;
        tracing::info!(stream, event = %json, "audit event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_after_init() {
        let mut processor = LogProcessor::new();
        processor.init(&CommonProperties::default()).unwrap();

        let mut event = Event::new();
        let objects = ProcessingObjects::new();
        processor.process(&mut event, "default", &objects).unwrap();
    }

    #[test]
    fn test_process_before_init_fails() {
        let processor = LogProcessor::new();
        let mut event = Event::new();
        let objects = ProcessingObjects::new();

        let err = processor.process(&mut event, "default", &objects).unwrap_err();
        assert!(matches!(err, AuditError::NotInitialized(_)));
    }

    #[test]
    fn test_not_reversible() {
        let processor = LogProcessor::new();
        assert!(processor.as_reversible().is_none());
    }
}
