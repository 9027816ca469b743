//! Per-call registry of caller-supplied collaborator references
//!
//! Callers register live collaborators (a database session, an open
//! transaction, a request context) under a name before invoking the audit
//! facade; processors look them up by name during the same call. The
//! registry holds shared references only; the collaborator's lifecycle
//! belongs to whoever created it.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::error::{AuditError, Result};

/// Type-erased shared reference to a caller-supplied collaborator
pub type SharedObject = Arc<dyn Any + Send + Sync>;

/// Thread-safe named registry of collaborator references
///
/// One instance is created per `audit()` call (or supplied by the caller)
/// and may be read and written concurrently by the processors sharing it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use veritrail::ProcessingObjects;
///
/// let objects = ProcessingObjects::new();
/// objects.add("request-id", Arc::new("req-42".to_string())).unwrap();
///
/// let request_id = objects.get_as::<String>("request-id").unwrap();
/// assert_eq!(request_id.as_str(), "req-42");
/// ```
#[derive(Default)]
pub struct ProcessingObjects {
    objects: RwLock<HashMap<String, SharedObject>>,
}

impl ProcessingObjects {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collaborator under a name, replacing any prior value
    ///
    /// # Errors
    ///
    /// Returns `AuditError::InvalidArgument` if the name is blank.
    pub fn add<S: Into<String>>(&self, name: S, value: SharedObject) -> Result<()> {
        let name = name.into();
        Self::validate_name(&name)?;
        self.objects.write().unwrap().insert(name, value);
        Ok(())
    }

    /// Look up a collaborator by name
    ///
    /// The returned reference is the identical one that was added.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::InvalidArgument` on a blank name and
    /// `AuditError::ObjectNotFound` if nothing was added under it.
    pub fn get(&self, name: &str) -> Result<SharedObject> {
        Self::validate_name(name)?;
        self.objects
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| AuditError::object_not_found(name))
    }

    /// Look up a collaborator and downcast it to a concrete type
    ///
    /// # Errors
    ///
    /// As [`get`](Self::get), plus `AuditError::InvalidArgument` when the
    /// registered object is not of type `T`.
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        let object = self.get(name)?;
        object.downcast::<T>().map_err(|_| {
            AuditError::invalid_argument(format!(
                "processing object '{}' is not of the requested type",
                name
            ))
        })
    }

    /// Whether a collaborator is registered under the name
    ///
    /// # Errors
    ///
    /// Returns `AuditError::InvalidArgument` if the name is blank.
    pub fn contains(&self, name: &str) -> Result<bool> {
        Self::validate_name(name)?;
        Ok(self.objects.read().unwrap().contains_key(name))
    }

    /// Remove a collaborator, returning whether one was registered
    ///
    /// # Errors
    ///
    /// Returns `AuditError::InvalidArgument` if the name is blank.
    pub fn remove(&self, name: &str) -> Result<bool> {
        Self::validate_name(name)?;
        Ok(self.objects.write().unwrap().remove(name).is_some())
    }

    /// Snapshot of registered names
    pub fn object_names(&self) -> Vec<String> {
        self.objects.read().unwrap().keys().cloned().collect()
    }

    /// Number of registered collaborators
    pub fn len(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.objects.read().unwrap().is_empty()
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(AuditError::invalid_argument(
                "processing object name must not be blank",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ProcessingObjects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.object_names();
        names.sort();
        f.debug_struct("ProcessingObjects")
            .field("names", &names)
            .finish()
    }
}
