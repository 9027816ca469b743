//! Plugin contracts: processors, reversibility, and the audit facade
//!
//! A [`Processor`] is one pluggable unit of work executed per audit event.
//! Processors that can compensate their own side effects additionally
//! expose the [`Reversible`] capability through
//! [`as_reversible`](Processor::as_reversible); the engine invokes it
//! during rollback. The [`Audit`] trait is the caller-facing facade.

use crate::error::Result;
use crate::event::Event;
use crate::factory::PluginRegistry;
use crate::processing::ProcessingObjects;
use crate::properties::CommonProperties;

/// A pluggable unit of work executed once per audit event
///
/// Implementations must be internally thread-safe: a singleton processor
/// is shared across concurrent `audit()` calls and the engine never
/// serializes calls into it.
pub trait Processor: Send + Sync {
    /// Implementation name, matching the name it is registered under
    fn name(&self) -> &str;

    /// One-time setup from the configuration snapshot
    ///
    /// Called exactly once by the factory before the instance is handed
    /// out. May fail on invalid configuration.
    fn init(&mut self, properties: &CommonProperties) -> Result<()>;

    /// Process one event for the given stream
    ///
    /// Later processors in a chain observe mutations made here. Blocking
    /// is allowed; the engine imposes no timeout.
    fn process(
        &self,
        event: &mut Event,
        stream: &str,
        objects: &ProcessingObjects,
    ) -> Result<()>;

    /// Release resources when the instance is retired
    fn clean_up(&self) {}

    /// Reversible capability discovery
    ///
    /// Return `Some(self)` from processors whose `process` has an
    /// undoable side effect. The default (`None`) marks the processor as
    /// skip-during-rollback.
    fn as_reversible(&self) -> Option<&dyn Reversible> {
        None
    }
}

/// Optional capability: compensate a processor's prior contribution
pub trait Reversible: Send + Sync {
    /// Undo the effect of a prior successful `process` on this event
    ///
    /// Invoked at most once per successful `process`, in reverse chain
    /// order, while the engine rolls back a failed `audit()` call.
    fn revert(&self, event: &mut Event) -> Result<()>;
}

/// Caller-facing audit facade
///
/// All three entry points run the same chain; the shorter forms default
/// the stream name and the processing-object registry.
pub trait Audit: Send + Sync {
    /// One-time setup: resolve configuration and the processor chain
    fn init(&mut self, properties: &CommonProperties, registry: &PluginRegistry) -> Result<()>;

    /// Stream name used by [`audit`](Self::audit)
    fn default_stream(&self) -> &str;

    /// Audit an event on the default configured stream
    fn audit(&self, event: Event) -> Result<Event> {
        let objects = ProcessingObjects::new();
        self.audit_with(event, self.default_stream(), &objects)
    }

    /// Audit an event on a named stream
    fn audit_stream(&self, event: Event, stream: &str) -> Result<Event> {
        let objects = ProcessingObjects::new();
        self.audit_with(event, stream, &objects)
    }

    /// Audit an event on a named stream with caller-supplied collaborators
    ///
    /// On success the (possibly processor-mutated) event is returned; on
    /// failure the original forward-processing error surfaces after
    /// rollback.
    fn audit_with(
        &self,
        event: Event,
        stream: &str,
        objects: &ProcessingObjects,
    ) -> Result<Event>;

    /// Release resources when the instance is retired
    fn clean_up(&self) {}
}
