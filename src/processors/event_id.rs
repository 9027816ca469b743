//! Event-ID enrichment processor

use rand::Rng;

use crate::error::{AuditError, Result};
use crate::event::Event;
use crate::field::Field;
use crate::processing::ProcessingObjects;
use crate::processor::{Processor, Reversible};
use crate::properties::CommonProperties;

/// Enriches events with a random 128-bit identifier
///
/// The field name is resolved from the configured field-name table at
/// init. An event that already carries the field keeps its identifier.
/// Identifiers come from the thread-local generator, so a shared
/// singleton stays safe under concurrent `audit()` calls.
pub struct EventIdProcessor {
    field_name: String,
    initialized: bool,
}

impl EventIdProcessor {
    pub fn new() -> Self {
        Self {
            field_name: String::new(),
            initialized: false,
        }
    }
}

impl Default for EventIdProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for EventIdProcessor {
    fn name(&self) -> &str {
        "event-id"
    }

    fn init(&mut self, properties: &CommonProperties) -> Result<()> {
        self.field_name = properties.field_names().event_id().to_string();
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
                "event-id processor used before init",
            ));
        }
        if event.contains_field(&self.field_name) {
            tracing::trace!(field = %self.field_name, "event already carries an id");
            return Ok(());
        }

        let id: u128 = rand::rng().random();
        event.set_field(Field::new(
            self.field_name.as_str(),
            format!("{:032x}", id).into_bytes(),
        )?);
        Ok(())
    }

    fn as_reversible(&self) -> Option<&dyn Reversible> {
        Some(self)
    }
}

impl Reversible for EventIdProcessor {
    /// Removes the identifier enrichment from the event
    fn revert(&self, event: &mut Event) -> Result<()> {
        event.unset_field(&self.field_name);
        Ok(())
    }
}
