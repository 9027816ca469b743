//! Audit events: containers of uniquely named fields
//!
//! An [`Event`] maps field names to [`Field`]s and serializes to the
//! versioned wire shape `{"version":"1.0","fields":{...}}`. Fields are
//! stored sorted by name, so the serialized form is deterministic no
//! matter the order in which fields were set.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};
use crate::field::Field;
use crate::properties::CommonProperties;

/// Schema version of the serialized event document
pub const EVENT_SCHEMA_VERSION: &str = "1.0";

/// Serialized event document
#[derive(Debug, Serialize, Deserialize)]
struct EventDocument {
    version: String,
    fields: BTreeMap<String, String>,
}

/// A structured audit record composed of named fields
///
/// Field names are unique per event; setting a field under an existing
/// name replaces the previous field. The event takes ownership of every
/// field handed to it.
///
/// # Example
///
/// ```
/// use veritrail::{Event, Field};
///
/// let mut event = Event::new();
/// event.set_field(Field::new("actor", b"alice".to_vec()).unwrap());
/// event.set_field(Field::new("action", b"login".to_vec()).unwrap());
///
/// let json = event.to_json().unwrap();
/// assert_eq!(json, r#"{"version":"1.0","fields":{"action":"login","actor":"alice"}}"#);
/// ```
#[derive(Debug, Default)]
pub struct Event {
    fields: BTreeMap<String, Field>,
}

impl Event {
    /// Create an empty event
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an event pre-populated with fields
    ///
    /// Later fields win when names collide.
    pub fn with_fields(fields: Vec<Field>) -> Self {
        let mut event = Self::new();
        for field in fields {
            event.set_field(field);
        }
        event
    }

    /// Insert or replace a field, keyed by its name
    pub fn set_field(&mut self, field: Field) {
        self.fields.insert(field.name().to_string(), field);
    }

    /// Look up a field by name
    ///
    /// # Errors
    ///
    /// Returns `AuditError::FieldNotFound` if no field has that name.
    pub fn get_field(&self, name: &str) -> Result<&Field> {
        self.fields
            .get(name)
            .ok_or_else(|| AuditError::field_not_found(name))
    }

    /// Whether a field with the given name is present
    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Remove a field by name, returning whether one was removed
    pub fn unset_field(&mut self, name: &str) -> bool {
        self.fields.remove(name).is_some()
    }

    /// Snapshot of field names in sorted order
    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    /// Iterate fields in sorted-name order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the event has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize to the versioned wire shape
    ///
    /// Values are each field's character view; keys are sorted by field
    /// name, so equal events always serialize byte-for-byte identically.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Encoding` if any field's payload cannot be
    /// decoded to characters.
    pub fn to_json(&self) -> Result<String> {
        let mut fields = BTreeMap::new();
        for field in self.fields.values() {
            fields.insert(field.name().to_string(), field.char_value()?);
        }
        let document = EventDocument {
            version: EVENT_SCHEMA_VERSION.to_string(),
            fields,
        };
        Ok(serde_json::to_string(&document)?)
    }

    /// Rebuild an event from its serialized wire shape
    ///
    /// Restored fields are plain-encoded and carry the decoded character
    /// values, so `to_json`/`from_json` round-trips every field's char
    /// view.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Json` on malformed input and
    /// `AuditError::InvalidEvent` on an unsupported schema version.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: EventDocument = serde_json::from_str(json)?;
        if document.version != EVENT_SCHEMA_VERSION {
            return Err(AuditError::invalid_event(format!(
                "unsupported event version '{}', expected '{}'",
                document.version, EVENT_SCHEMA_VERSION
            )));
        }

        let mut event = Self::new();
        for (name, value) in document.fields {
            event.set_field(Field::new(name, value.into_bytes())?);
        }
        Ok(event)
    }

    /// Wipe every field's payload, then drop all fields
    pub fn clear(&mut self) {
        for field in self.fields.values_mut() {
            field.clear();
        }
        self.fields.clear();
    }
}

/// An event with named setters for the well-known audit attributes
///
/// Setters resolve the actual field name through the configured
/// [`FieldNames`](crate::properties::FieldNames) table and encode values
/// with the configured default encoding.
#[derive(Debug)]
pub struct ExtendedEvent {
    event: Event,
    properties: Arc<CommonProperties>,
}

impl ExtendedEvent {
    /// Create an empty extended event
    pub fn new(properties: Arc<CommonProperties>) -> Self {
        Self {
            event: Event::new(),
            properties,
        }
    }

    /// Wrap an existing event
    pub fn from_event(event: Event, properties: Arc<CommonProperties>) -> Self {
        Self { event, properties }
    }

    /// Set the actor (who performed the audited action)
    pub fn set_actor(&mut self, value: &str) -> Result<()> {
        let props = Arc::clone(&self.properties);
        self.set_named(props.field_names().actor(), value)
    }

    /// Set the action being audited
    pub fn set_action(&mut self, value: &str) -> Result<()> {
        let props = Arc::clone(&self.properties);
        self.set_named(props.field_names().action(), value)
    }

    /// Set the origin (host, service, or component)
    pub fn set_origin(&mut self, value: &str) -> Result<()> {
        let props = Arc::clone(&self.properties);
        self.set_named(props.field_names().origin(), value)
    }

    /// Set the subject of the audited action
    pub fn set_subject(&mut self, value: &str) -> Result<()> {
        let props = Arc::clone(&self.properties);
        self.set_named(props.field_names().subject(), value)
    }

    /// Set the object acted upon
    pub fn set_object(&mut self, value: &str) -> Result<()> {
        let props = Arc::clone(&self.properties);
        self.set_named(props.field_names().object(), value)
    }

    /// Set the outcome of the audited action
    pub fn set_result(&mut self, value: &str) -> Result<()> {
        let props = Arc::clone(&self.properties);
        self.set_named(props.field_names().result(), value)
    }

    /// Set the timestamp field
    pub fn set_timestamp(&mut self, value: &str) -> Result<()> {
        let props = Arc::clone(&self.properties);
        self.set_named(props.field_names().timestamp(), value)
    }

    /// Set the event-ID field
    pub fn set_event_id(&mut self, value: &str) -> Result<()> {
        let props = Arc::clone(&self.properties);
        self.set_named(props.field_names().event_id(), value)
    }

    fn set_named(&mut self, name: &str, value: &str) -> Result<()> {
        let field = Field::from_chars(name, value, self.properties.encoding())?;
        self.event.set_field(field);
        Ok(())
    }

    /// Borrow the underlying event
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Mutably borrow the underlying event
    pub fn event_mut(&mut self) -> &mut Event {
        &mut self.event
    }

    /// Unwrap into the underlying event
    pub fn into_event(self) -> Event {
        self.event
    }
}
