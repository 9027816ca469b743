//! Processor-chain execution engine
//!
//! [`AuditPipeline`] is the default [`Audit`] implementation: it resolves
//! the configured processor chain once at `init()` and then, per call,
//! runs each processor in strict configured order on the caller's thread.
//! When a processor fails, already-succeeded reversible processors are
//! compensated in reverse order and the original error surfaces to the
//! caller. Rollback is best-effort, not atomic: a revert failure is
//! logged and rollback continues with the remaining processors.

use std::sync::Arc;

use crate::error::{AuditError, Result};
use crate::event::Event;
use crate::factory::PluginRegistry;
use crate::processing::ProcessingObjects;
use crate::processor::{Audit, Processor};
use crate::properties::CommonProperties;

/// Ordered processor chain with partial-failure rollback
///
/// A single pipeline may be invoked concurrently from many threads; the
/// chain itself is immutable after `init()` and processors are shared
/// singletons responsible for their own internal concurrency.
///
/// # Example
///
/// ```
/// use veritrail::{Audit, AuditPipeline, CommonProperties, Event, Field, PluginRegistry};
///
/// let registry = PluginRegistry::new();
/// let props = CommonProperties::new().with_processors(["event-id", "timestamp", "log"]);
///
/// let mut pipeline = AuditPipeline::new();
/// pipeline.init(&props, &registry).unwrap();
///
/// let mut event = Event::new();
/// event.set_field(Field::new("action", b"login".to_vec()).unwrap());
///
/// let event = pipeline.audit(event).unwrap();
/// assert!(event.contains_field("event_id"));
/// assert!(event.contains_field("timestamp"));
/// ```
pub struct AuditPipeline {
    processors: Vec<Arc<dyn Processor>>,
    default_stream: String,
    initialized: bool,
}

impl AuditPipeline {
    /// Create an uninitialized pipeline
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
            default_stream: String::new(),
            initialized: false,
        }
    }

    /// Names of the resolved chain, in execution order
    pub fn processor_names(&self) -> Vec<String> {
        self.processors
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Revert already-succeeded processors in reverse order
    ///
    /// Returns the number of failed reverts. Never stops early: each
    /// remaining processor still gets its chance to compensate.
    fn revert_chain(&self, event: &mut Event, succeeded: &[Arc<dyn Processor>]) -> usize {
        let mut failed_reverts = 0;
        for processor in succeeded.iter().rev() {
            match processor.as_reversible() {
                Some(reversible) => {
                    if let Err(revert_err) = reversible.revert(event) {
                        failed_reverts += 1;
                        tracing::error!(
                            processor = processor.name(),
                            error = %revert_err,
                            "revert failed, continuing rollback"
                        );
                    } else {
                        tracing::debug!(processor = processor.name(), "reverted");
                    }
                }
                None => {
                    tracing::debug!(
                        processor = processor.name(),
                        "not reversible, skipped during rollback"
                    );
                }
            }
        }
        failed_reverts
    }
}

impl Default for AuditPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Audit for AuditPipeline {
    /// Resolve the configured chain through the registry
    ///
    /// Honors `fail_on_missing_processors`: when true, an unresolvable
    /// processor name aborts initialization; when false it is skipped
    /// with a warning. Processors are resolved as shared singletons.
    fn init(&mut self, properties: &CommonProperties, registry: &PluginRegistry) -> Result<()> {
        properties.validate()?;

        let mut processors: Vec<Arc<dyn Processor>> = Vec::new();
        for name in properties.processors() {
            if !registry.has_processor(&name) {
                if properties.fail_on_missing_processors() {
                    return Err(AuditError::configuration(format!(
                        "processor '{}' is not registered",
                        name
                    )));
                }
                tracing::warn!(processor = %name, "processor not registered, skipping");
                continue;
            }
            processors.push(registry.processor_singleton(&name, properties)?);
        }

        self.processors = processors;
        self.default_stream = properties.default_stream().to_string();
        self.initialized = true;
        tracing::debug!(
            processors = ?self.processor_names(),
            stream = %self.default_stream,
            "audit pipeline initialized"
        );
        Ok(())
    }

    fn default_stream(&self) -> &str {
        &self.default_stream
    }

    fn audit_with(
        &self,
        mut event: Event,
        stream: &str,
        objects: &ProcessingObjects,
    ) -> Result<Event> {
        if !self.initialized {
            return Err(AuditError::not_initialized(
                "audit pipeline used before init",
            ));
        }

        tracing::trace!(stream, processors = self.processors.len(), "audit chain running");

        let mut succeeded: Vec<Arc<dyn Processor>> = Vec::with_capacity(self.processors.len());
        for processor in &self.processors {
            match processor.process(&mut event, stream, objects) {
                Ok(()) => succeeded.push(Arc::clone(processor)),
                Err(err) => {
                    tracing::error!(
                        processor = processor.name(),
                        stream,
                        error = %err,
                        "processor failed, rolling back chain"
                    );
                    let failed_reverts = self.revert_chain(&mut event, &succeeded);
                    if failed_reverts == 0 {
                        tracing::debug!(stream, "chain rolled back");
                    } else {
                        tracing::error!(stream, failed_reverts, "chain rollback incomplete");
                    }
                    // The forward-processing error is never swallowed.
                    return Err(err);
                }
            }
        }

        tracing::trace!(stream, "audit chain completed");
        Ok(event)
    }

    fn clean_up(&self) {
        // Chain processors are registry-owned singletons; the registry's
        // reset() retires them.
        tracing::debug!(processors = self.processors.len(), "audit pipeline retired");
    }
}
