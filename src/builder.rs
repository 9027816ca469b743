//! Fluent construction of audit events
//!
//! The builder accumulates fields into an internal [`Event`] and hands it
//! over on [`build`](EventBuilder::build). Validation failures during the
//! fluent chain are deferred and surfaced by `build`, so call sites stay
//! free of per-call error plumbing.

use std::sync::Arc;

use crate::encoding::Encoding;
use crate::error::{AuditError, Result};
use crate::event::Event;
use crate::field::Field;
use crate::properties::CommonProperties;

/// Fluent accumulator for [`Event`] fields
///
/// Holds a [`CommonProperties`] reference for well-known field-name
/// resolution and the default character encoding. `build` consumes the
/// builder; a builder is single-use.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use veritrail::{CommonProperties, EventBuilder};
///
/// let props = Arc::new(CommonProperties::default());
/// let event = EventBuilder::new(props)
///     .actor("alice")
///     .action("login")
///     .result("success")
///     .build()
///     .unwrap();
///
/// assert_eq!(event.len(), 3);
/// ```
#[derive(Debug)]
pub struct EventBuilder {
    event: Event,
    properties: Arc<CommonProperties>,
    error: Option<AuditError>,
}

impl EventBuilder {
    /// Create an empty builder
    pub fn new(properties: Arc<CommonProperties>) -> Self {
        Self {
            event: Event::new(),
            properties,
            error: None,
        }
    }

    /// Add a pre-built field
    pub fn field(mut self, field: Field) -> Self {
        self.event.set_field(field);
        self
    }

    /// Add a plain-encoded byte field
    pub fn field_bytes<S: Into<String>>(self, name: S, payload: Vec<u8>) -> Self {
        let field = Field::new(name, payload);
        self.record(field)
    }

    /// Add a byte field with an explicit payload encoding
    pub fn field_bytes_encoded<S: Into<String>>(
        self,
        name: S,
        payload: Vec<u8>,
        encoding: Encoding,
    ) -> Self {
        let field = Field::with_encoding(name, payload, encoding);
        self.record(field)
    }

    /// Add a character field, encoded with the configured default encoding
    pub fn field_chars<S: Into<String>>(self, name: S, value: &str) -> Self {
        let encoding = self.properties.encoding();
        let field = Field::from_chars(name, value, encoding);
        self.record(field)
    }

    /// Set the actor field (configured name)
    pub fn actor(self, value: &str) -> Self {
        let name = self.properties.field_names().actor().to_string();
        self.field_chars(name, value)
    }

    /// Set the action field (configured name)
    pub fn action(self, value: &str) -> Self {
        let name = self.properties.field_names().action().to_string();
        self.field_chars(name, value)
    }

    /// Set the origin field (configured name)
    pub fn origin(self, value: &str) -> Self {
        let name = self.properties.field_names().origin().to_string();
        self.field_chars(name, value)
    }

    /// Set the subject field (configured name)
    pub fn subject(self, value: &str) -> Self {
        let name = self.properties.field_names().subject().to_string();
        self.field_chars(name, value)
    }

    /// Set the object field (configured name)
    pub fn object(self, value: &str) -> Self {
        let name = self.properties.field_names().object().to_string();
        self.field_chars(name, value)
    }

    /// Set the result field (configured name)
    pub fn result(self, value: &str) -> Self {
        let name = self.properties.field_names().result().to_string();
        self.field_chars(name, value)
    }

    /// Finish building, returning the accumulated event
    ///
    /// Consumes the builder. If any fluent call failed, the first error
    /// is returned instead of the event.
    pub fn build(self) -> Result<Event> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.event),
        }
    }

    fn record(mut self, field: Result<Field>) -> Self {
        match field {
            Ok(field) => self.event.set_field(field),
            Err(err) => {
                if self.error.is_none() {
                    self.error = Some(err);
                }
            }
        }
        self
    }
}
