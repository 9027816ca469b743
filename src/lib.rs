/*!
 * Veritrail - pluggable audit-trail pipeline
 *
 * A structured audit library with:
 * - Named, encoded event fields with secure payload wiping
 * - Deterministic, versioned JSON event serialization
 * - Ordered processor chains with compensating rollback on failure
 * - Name-driven plugin resolution with singleton caching and reset
 * - Per-call registries for caller-supplied collaborators
 *
 * Application code builds an [`Event`] (directly, through
 * [`EventBuilder`], or as an [`ExtendedEvent`]) and hands it to an
 * [`Audit`] implementation resolved from a [`PluginRegistry`]. The
 * default implementation, [`AuditPipeline`], runs each configured
 * [`Processor`] in strict order; when one fails, already-succeeded
 * [`Reversible`] processors are compensated in reverse order and the
 * original error surfaces to the caller.
 */

pub mod builder;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod event;
pub mod factory;
pub mod field;
pub mod logging;
pub mod processing;
pub mod processor;
pub mod processors;
pub mod properties;

// Re-export commonly used types
pub use builder::EventBuilder;
pub use encoding::Encoding;
pub use engine::AuditPipeline;
pub use error::{AuditError, Result};
pub use event::{Event, ExtendedEvent, EVENT_SCHEMA_VERSION};
pub use factory::{AuditCtor, PluginRegistry, ProcessorCtor};
pub use field::Field;
pub use processing::{ProcessingObjects, SharedObject};
pub use processor::{Audit, Processor, Reversible};
pub use properties::{CommonProperties, FieldNames};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
