//! Plugin registry and factory for audit implementations and processors
//!
//! Implementation names from configuration are resolved here to live,
//! fully initialized instances. The registry is an explicit object owned
//! by the composing application: built-ins are registered at
//! construction and custom plugins are added with the `register_*`
//! methods, so "construct by name" never needs runtime reflection.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::engine::AuditPipeline;
use crate::error::{AuditError, Result};
use crate::processor::{Audit, Processor};
use crate::processors::{EventIdProcessor, JsonLinesProcessor, LogProcessor, TimestampProcessor};
use crate::properties::CommonProperties;

/// Constructor function for a processor implementation
pub type ProcessorCtor = Arc<dyn Fn() -> Box<dyn Processor> + Send + Sync>;

/// Constructor function for an audit implementation
pub type AuditCtor = Arc<dyn Fn() -> Box<dyn Audit> + Send + Sync>;

/// Name-driven factory for the Processor and Audit capabilities
///
/// `*_instance` builds a fresh, initialized instance per call;
/// `*_singleton` memoizes exactly one instance per name until
/// [`reset`](Self::reset). An instance is only ever published after its
/// `init()` succeeded.
///
/// # Example
///
/// ```
/// use veritrail::{CommonProperties, PluginRegistry};
///
/// let registry = PluginRegistry::new();
/// let props = CommonProperties::default();
///
/// let a = registry.processor_singleton("log", &props).unwrap();
/// let b = registry.processor_singleton("log", &props).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// ```
pub struct PluginRegistry {
    processor_ctors: RwLock<HashMap<String, ProcessorCtor>>,
    audit_ctors: RwLock<HashMap<String, AuditCtor>>,
    processor_singletons: RwLock<HashMap<String, Arc<dyn Processor>>>,
    audit_singletons: RwLock<HashMap<String, Arc<dyn Audit>>>,
}

impl PluginRegistry {
    /// Create a registry with the built-in implementations registered
    pub fn new() -> Self {
        let registry = Self {
            processor_ctors: RwLock::new(HashMap::new()),
            audit_ctors: RwLock::new(HashMap::new()),
            processor_singletons: RwLock::new(HashMap::new()),
            audit_singletons: RwLock::new(HashMap::new()),
        };

        registry.register_builtin();
        registry
    }

    /// Register built-in processor and audit constructors
    fn register_builtin(&self) {
        self.register_processor(
            "log",
            Arc::new(|| Box::new(LogProcessor::new()) as Box<dyn Processor>),
        );
        self.register_processor(
            "event-id",
            Arc::new(|| Box::new(EventIdProcessor::new()) as Box<dyn Processor>),
        );
        self.register_processor(
            "timestamp",
            Arc::new(|| Box::new(TimestampProcessor::new()) as Box<dyn Processor>),
        );
        self.register_processor(
            "json-lines",
            Arc::new(|| Box::new(JsonLinesProcessor::new()) as Box<dyn Processor>),
        );

        self.register_audit(
            "pipeline",
            Arc::new(|| Box::new(AuditPipeline::new()) as Box<dyn Audit>),
        );
    }

    /// Register a custom processor constructor under a name
    pub fn register_processor(&self, name: impl Into<String>, ctor: ProcessorCtor) {
        self.processor_ctors.write().unwrap().insert(name.into(), ctor);
    }

    /// Register a custom audit constructor under a name
    pub fn register_audit(&self, name: impl Into<String>, ctor: AuditCtor) {
        self.audit_ctors.write().unwrap().insert(name.into(), ctor);
    }

    /// Whether a processor is registered under the name
    pub fn has_processor(&self, name: &str) -> bool {
        self.processor_ctors.read().unwrap().contains_key(name)
    }

    /// Whether an audit implementation is registered under the name
    pub fn has_audit(&self, name: &str) -> bool {
        self.audit_ctors.read().unwrap().contains_key(name)
    }

    /// Names of all registered processors
    pub fn registered_processors(&self) -> Vec<String> {
        self.processor_ctors.read().unwrap().keys().cloned().collect()
    }

    /// Names of all registered audit implementations
    pub fn registered_audits(&self) -> Vec<String> {
        self.audit_ctors.read().unwrap().keys().cloned().collect()
    }

    /// Build a fresh, initialized processor
    ///
    /// Every call returns a distinct instance.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Factory` on an unresolvable name, a name
    /// registered under the other capability, or an `init()` failure.
    pub fn processor_instance(
        &self,
        name: &str,
        properties: &CommonProperties,
    ) -> Result<Arc<dyn Processor>> {
        self.build_processor(name, properties).map(Arc::from)
    }

    /// Get or create the cached singleton processor for a name
    ///
    /// Exactly one instance per name is ever observable, even under a
    /// race of concurrent first accesses; later calls return the cached
    /// instance regardless of the properties supplied.
    pub fn processor_singleton(
        &self,
        name: &str,
        properties: &CommonProperties,
    ) -> Result<Arc<dyn Processor>> {
        if let Some(processor) = self.processor_singletons.read().unwrap().get(name) {
            return Ok(Arc::clone(processor));
        }

        let mut cache = self.processor_singletons.write().unwrap();
        if let Some(processor) = cache.get(name) {
            return Ok(Arc::clone(processor));
        }

        // Construction happens under the write lock: losers of the race
        // block above and then observe the winner's instance.
        let processor: Arc<dyn Processor> = Arc::from(self.build_processor(name, properties)?);
        cache.insert(name.to_string(), Arc::clone(&processor));
        Ok(processor)
    }

    /// Build a fresh, initialized audit implementation
    pub fn audit_instance(
        &self,
        name: &str,
        properties: &CommonProperties,
    ) -> Result<Arc<dyn Audit>> {
        self.build_audit(name, properties).map(Arc::from)
    }

    /// Get or create the cached singleton audit implementation for a name
    pub fn audit_singleton(
        &self,
        name: &str,
        properties: &CommonProperties,
    ) -> Result<Arc<dyn Audit>> {
        if let Some(audit) = self.audit_singletons.read().unwrap().get(name) {
            return Ok(Arc::clone(audit));
        }

        let mut cache = self.audit_singletons.write().unwrap();
        if let Some(audit) = cache.get(name) {
            return Ok(Arc::clone(audit));
        }

        let audit: Arc<dyn Audit> = Arc::from(self.build_audit(name, properties)?);
        cache.insert(name.to_string(), Arc::clone(&audit));
        Ok(audit)
    }

    /// Clear the singleton caches for all names
    ///
    /// Evicted instances are retired through their `clean_up()`; the next
    /// `*_singleton` call for a name constructs a fresh instance.
    pub fn reset(&self) {
        let processors: Vec<_> = self
            .processor_singletons
            .write()
            .unwrap()
            .drain()
            .collect();
        for (name, processor) in processors {
            tracing::debug!(processor = %name, "retiring singleton processor");
            processor.clean_up();
        }

        let audits: Vec<_> = self.audit_singletons.write().unwrap().drain().collect();
        for (name, audit) in audits {
            tracing::debug!(audit = %name, "retiring singleton audit");
            audit.clean_up();
        }
    }

    fn build_processor(
        &self,
        name: &str,
        properties: &CommonProperties,
    ) -> Result<Box<dyn Processor>> {
        let ctor = self.processor_ctors.read().unwrap().get(name).cloned();
        let ctor = match ctor {
            Some(ctor) => ctor,
            None if self.has_audit(name) => {
                return Err(AuditError::factory(
                    name,
                    "registered as an audit implementation, not a processor",
                ));
            }
            None => {
                return Err(AuditError::factory(name, "no such processor registered"));
            }
        };

        let mut processor = ctor();
        processor
            .init(properties)
            .map_err(|e| AuditError::factory(name, format!("initialization failed: {}", e)))?;
        Ok(processor)
    }

    fn build_audit(&self, name: &str, properties: &CommonProperties) -> Result<Box<dyn Audit>> {
        let ctor = self.audit_ctors.read().unwrap().get(name).cloned();
        let ctor = match ctor {
            Some(ctor) => ctor,
            None if self.has_processor(name) => {
                return Err(AuditError::factory(
                    name,
                    "registered as a processor, not an audit implementation",
                ));
            }
            None => {
                return Err(AuditError::factory(
                    name,
                    "no such audit implementation registered",
                ));
            }
        };

        let mut audit = ctor();
        audit
            .init(properties, self)
            .map_err(|e| AuditError::factory(name, format!("initialization failed: {}", e)))?;
        Ok(audit)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
