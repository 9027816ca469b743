/*!
 * Integration tests for plugin resolution and singleton caching
 *
 * These tests exercise the registry across threads and through the
 * audit facade: per-call instances, cached singletons, reset semantics,
 * and failure modes for unresolvable or miscategorized names.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use veritrail::{
    AuditError, CommonProperties, Event, PluginRegistry, ProcessingObjects, Processor, Result,
};

/// Processor counting constructions and clean-ups
struct LifecycleProcessor {
    cleaned: Arc<AtomicUsize>,
}

impl Processor for LifecycleProcessor {
    fn name(&self) -> &str {
        "lifecycle"
    }

    fn init(&mut self, _properties: &CommonProperties) -> Result<()> {
        Ok(())
    }

    fn process(
        &self,
        _event: &mut Event,
        _stream: &str,
        _objects: &ProcessingObjects,
    ) -> Result<()> {
        Ok(())
    }

    fn clean_up(&self) {
        self.cleaned.fetch_add(1, Ordering::SeqCst);
    }
}

fn register_lifecycle(
    registry: &PluginRegistry,
) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let constructed = Arc::new(AtomicUsize::new(0));
    let cleaned = Arc::new(AtomicUsize::new(0));
    {
        let constructed = Arc::clone(&constructed);
        let cleaned = Arc::clone(&cleaned);
        registry.register_processor(
            "lifecycle",
            Arc::new(move || {
                constructed.fetch_add(1, Ordering::SeqCst);
                Box::new(LifecycleProcessor {
                    cleaned: Arc::clone(&cleaned),
                }) as Box<dyn Processor>
            }),
        );
    }
    (constructed, cleaned)
}

#[test]
fn test_instances_are_distinct_singletons_are_shared() {
    let registry = PluginRegistry::new();
    let (constructed, _) = register_lifecycle(&registry);
    let props = CommonProperties::default();

    let a = registry.processor_instance("lifecycle", &props).unwrap();
    let b = registry.processor_instance("lifecycle", &props).unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(constructed.load(Ordering::SeqCst), 2);

    let s1 = registry.processor_singleton("lifecycle", &props).unwrap();
    let s2 = registry.processor_singleton("lifecycle", &props).unwrap();
    assert!(Arc::ptr_eq(&s1, &s2));
    assert_eq!(constructed.load(Ordering::SeqCst), 3);
}

#[test]
fn test_reset_retires_and_recreates_singletons() {
    let registry = PluginRegistry::new();
    let (constructed, cleaned) = register_lifecycle(&registry);
    let props = CommonProperties::default();

    let before = registry.processor_singleton("lifecycle", &props).unwrap();
    registry.reset();
    assert_eq!(cleaned.load(Ordering::SeqCst), 1);

    let after = registry.processor_singleton("lifecycle", &props).unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(constructed.load(Ordering::SeqCst), 2);
}

#[test]
fn test_concurrent_first_access_builds_exactly_one_singleton() {
    let registry = Arc::new(PluginRegistry::new());
    let (constructed, _) = register_lifecycle(&registry);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            registry
                .processor_singleton("lifecycle", &CommonProperties::default())
                .unwrap()
        }));
    }

    let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    for instance in &instances[1..] {
        assert!(Arc::ptr_eq(&instances[0], instance));
    }
}

#[test]
fn test_audit_singleton_shared_until_reset() {
    let registry = PluginRegistry::new();
    let props = CommonProperties::new().with_processors(["log"]);

    let a = registry.audit_singleton("pipeline", &props).unwrap();
    let b = registry.audit_singleton("pipeline", &props).unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    registry.reset();
    let c = registry.audit_singleton("pipeline", &props).unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
}

#[test]
fn test_unresolvable_and_miscategorized_names() {
    let registry = PluginRegistry::new();
    let props = CommonProperties::default();

    let err = registry.processor_instance("no-such", &props).unwrap_err();
    assert!(matches!(err, AuditError::Factory { .. }));

    // "pipeline" exists, but as an audit implementation
    let err = registry.processor_instance("pipeline", &props).unwrap_err();
    assert!(err.to_string().contains("audit implementation"));

    // "log" exists, but as a processor
    let err = registry.audit_instance("log", &props).unwrap_err();
    assert!(err.to_string().contains("not an audit implementation"));
}

#[test]
fn test_registered_names_listed() {
    let registry = PluginRegistry::new();
    register_lifecycle(&registry);

    let processors = registry.registered_processors();
    for name in ["log", "event-id", "timestamp", "json-lines", "lifecycle"] {
        assert!(processors.contains(&name.to_string()), "missing {}", name);
    }
    assert!(registry.registered_audits().contains(&"pipeline".to_string()));
}
