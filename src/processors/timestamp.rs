//! Timestamp enrichment processor

use chrono::format::{Item, StrftimeItems};
use chrono::Utc;

use crate::error::{AuditError, Result};
use crate::event::Event;
use crate::field::Field;
use crate::processing::ProcessingObjects;
use crate::processor::{Processor, Reversible};
use crate::properties::CommonProperties;

/// Enriches events with the current UTC time
///
/// The field name and chrono format string come from configuration; the
/// format is validated once at init so formatting at process time cannot
/// fail. An event that already carries the field keeps its timestamp.
pub struct TimestampProcessor {
    field_name: String,
    format: String,
    initialized: bool,
}

impl TimestampProcessor {
    pub fn new() -> Self {
        Self {
            field_name: String::new(),
            format: String::new(),
            initialized: false,
        }
    }
}

impl Default for TimestampProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for TimestampProcessor {
    fn name(&self) -> &str {
        "timestamp"
    }

    fn init(&mut self, properties: &CommonProperties) -> Result<()> {
        let format = properties.date_format().to_string();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(AuditError::configuration(format!(
                "invalid date format '{}'",
                format
            )));
        }

        self.field_name = properties.field_names().timestamp().to_string();
        self.format = format;
        self.initialized = true;
        Ok(())
    }

    fn process(
        &self,
        event: &mut Event,
        _stream: &str,
        _objects: &ProcessingObjects,
    ) -> Result<()> {
        if !self.initialized {
            return Err(AuditError::not_initialized(
                "timestamp processor used before init",
            ));
        }
        if event.contains_field(&self.field_name) {
            tracing::trace!(field = %self.field_name, "event already carries a timestamp");
            return Ok(());
        }

        let now = Utc::now().format(&self.format).to_string();
        event.set_field(Field::new(self.field_name.as_str(), now.into_bytes())?);
        Ok(())
    }

    fn as_reversible(&self) -> Option<&dyn Reversible> {
        Some(self)
    }
}

impl Reversible for TimestampProcessor {
    /// Removes the timestamp enrichment from the event
    fn revert(&self, event: &mut Event) -> Result<()> {
        event.unset_field(&self.field_name);
        Ok(())
    }
}
