//! Configuration snapshot shared by pipelines and processors
//!
//! `CommonProperties` is resolved once by the composing application (from a
//! config file, environment, or code) and handed to the factory, the
//! pipeline, and every processor's `init()`. Processor-specific keys travel
//! in the opaque `extras` map so new processors never require changes here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::encoding::Encoding;
use crate::error::{AuditError, Result};

fn default_audit_impl() -> String {
    "pipeline".to_string()
}

fn default_stream() -> String {
    "default".to_string()
}

fn default_date_format() -> String {
    // RFC 3339 with millisecond precision
    "%Y-%m-%dT%H:%M:%S%.3f%:z".to_string()
}

fn default_true() -> bool {
    true
}

fn default_actor() -> String {
    "actor".to_string()
}

fn default_action() -> String {
    "action".to_string()
}

fn default_origin() -> String {
    "origin".to_string()
}

fn default_subject() -> String {
    "subject".to_string()
}

fn default_object() -> String {
    "object".to_string()
}

fn default_result() -> String {
    "result".to_string()
}

fn default_timestamp() -> String {
    "timestamp".to_string()
}

fn default_event_id() -> String {
    "event_id".to_string()
}

/// Names used for the well-known event fields
///
/// Deployments that must match an existing schema override these; the
/// builder and `ExtendedEvent` resolve their named setters through this
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_actor")]
    actor: String,
    #[serde(default = "default_action")]
    action: String,
    #[serde(default = "default_origin")]
    origin: String,
    #[serde(default = "default_subject")]
    subject: String,
    #[serde(default = "default_object")]
    object: String,
    #[serde(default = "default_result")]
    result: String,
    #[serde(default = "default_timestamp")]
    timestamp: String,
    #[serde(default = "default_event_id")]
    event_id: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            actor: default_actor(),
            action: default_action(),
            origin: default_origin(),
            subject: default_subject(),
            object: default_object(),
            result: default_result(),
            timestamp: default_timestamp(),
            event_id: default_event_id(),
        }
    }
}

impl FieldNames {
    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Override the actor field name
    pub fn with_actor<S: Into<String>>(mut self, name: S) -> Self {
        self.actor = name.into();
        self
    }

    /// Override the event-ID field name
    pub fn with_event_id<S: Into<String>>(mut self, name: S) -> Self {
        self.event_id = name.into();
        self
    }

    /// Override the timestamp field name
    pub fn with_timestamp<S: Into<String>>(mut self, name: S) -> Self {
        self.timestamp = name.into();
        self
    }

    fn all(&self) -> [&str; 8] {
        [
            &self.actor,
            &self.action,
            &self.origin,
            &self.subject,
            &self.object,
            &self.result,
            &self.timestamp,
            &self.event_id,
        ]
    }
}

/// Main configuration snapshot for audit pipelines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonProperties {
    /// Registered name of the audit implementation to use
    #[serde(default = "default_audit_impl")]
    audit_impl: String,

    /// Stream name used when the caller does not supply one
    #[serde(default = "default_stream")]
    default_stream: String,

    /// Default payload encoding for character input
    #[serde(default)]
    encoding: Encoding,

    /// chrono format string for timestamp enrichment
    #[serde(default = "default_date_format")]
    date_format: String,

    /// Ordered list of processor names forming the chain
    #[serde(default)]
    processors: Vec<String>,

    /// Whether an unresolvable processor name aborts pipeline init
    #[serde(default = "default_true")]
    fail_on_missing_processors: bool,

    /// Well-known field name overrides
    #[serde(default)]
    field_names: FieldNames,

    /// Opaque pass-through map for processor-specific keys
    #[serde(default)]
    extras: HashMap<String, String>,
}

impl Default for CommonProperties {
    fn default() -> Self {
        Self {
            audit_impl: default_audit_impl(),
            default_stream: default_stream(),
            encoding: Encoding::default(),
            date_format: default_date_format(),
            processors: Vec::new(),
            fail_on_missing_processors: true,
            field_names: FieldNames::default(),
            extras: HashMap::new(),
        }
    }
}

impl CommonProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the audit implementation name
    pub fn with_audit_impl<S: Into<String>>(mut self, name: S) -> Self {
        self.audit_impl = name.into();
        self
    }

    /// Set the default stream name
    pub fn with_default_stream<S: Into<String>>(mut self, stream: S) -> Self {
        self.default_stream = stream.into();
        self
    }

    /// Set the default payload encoding for character input
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the timestamp format string
    pub fn with_date_format<S: Into<String>>(mut self, format: S) -> Self {
        self.date_format = format.into();
        self
    }

    /// Set the ordered processor chain
    pub fn with_processors<I, S>(mut self, processors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.processors = processors.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether an unresolvable processor aborts pipeline init
    pub fn with_fail_on_missing_processors(mut self, fail: bool) -> Self {
        self.fail_on_missing_processors = fail;
        self
    }

    /// Set the well-known field name table
    pub fn with_field_names(mut self, field_names: FieldNames) -> Self {
        self.field_names = field_names;
        self
    }

    /// Add a processor-specific pass-through key
    pub fn with_extra<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn audit_impl(&self) -> &str {
        &self.audit_impl
    }

    pub fn default_stream(&self) -> &str {
        &self.default_stream
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Ordered processor chain (snapshot copy)
    pub fn processors(&self) -> Vec<String> {
        self.processors.clone()
    }

    pub fn fail_on_missing_processors(&self) -> bool {
        self.fail_on_missing_processors
    }

    pub fn field_names(&self) -> &FieldNames {
        &self.field_names
    }

    /// Pass-through map (snapshot copy)
    pub fn extras(&self) -> HashMap<String, String> {
        self.extras.clone()
    }

    /// Look up a single pass-through key
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }

    /// Validate structural invariants of the snapshot
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Configuration` on blank stream, audit impl,
    /// processor, or field names.
    pub fn validate(&self) -> Result<()> {
        if self.audit_impl.trim().is_empty() {
            return Err(AuditError::configuration("audit_impl must not be blank"));
        }
        if self.default_stream.trim().is_empty() {
            return Err(AuditError::configuration(
                "default_stream must not be blank",
            ));
        }
        if self.processors.iter().any(|p| p.trim().is_empty()) {
            return Err(AuditError::configuration(
                "processor names must not be blank",
            ));
        }
        if self.field_names.all().iter().any(|n| n.trim().is_empty()) {
            return Err(AuditError::configuration("field names must not be blank"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let props = CommonProperties::default();
        assert_eq!(props.audit_impl(), "pipeline");
        assert_eq!(props.default_stream(), "default");
        assert_eq!(props.encoding(), Encoding::Plain);
        assert!(props.processors().is_empty());
        assert!(props.fail_on_missing_processors());
        assert_eq!(props.field_names().actor(), "actor");
        assert_eq!(props.field_names().event_id(), "event_id");
        assert!(props.validate().is_ok());
    }

    #[test]
    fn test_builder_style_configuration() {
        let props = CommonProperties::new()
            .with_default_stream("payments")
            .with_encoding(Encoding::Base64)
            .with_processors(["event-id", "timestamp", "log"])
            .with_fail_on_missing_processors(false)
            .with_extra("json_lines.path", "/var/log/audit.jsonl");

        assert_eq!(props.default_stream(), "payments");
        assert_eq!(props.encoding(), Encoding::Base64);
        assert_eq!(props.processors(), vec!["event-id", "timestamp", "log"]);
        assert!(!props.fail_on_missing_processors());
        assert_eq!(props.extra("json_lines.path"), Some("/var/log/audit.jsonl"));
        assert_eq!(props.extra("missing"), None);
    }

    #[test]
    fn test_processors_getter_is_a_snapshot() {
        let props = CommonProperties::new().with_processors(["log"]);
        let mut snapshot = props.processors();
        snapshot.push("rogue".to_string());
        assert_eq!(props.processors(), vec!["log"]);
    }

    #[test]
    fn test_field_name_overrides() {
        let props = CommonProperties::new().with_field_names(
            FieldNames::default()
                .with_actor("user")
                .with_event_id("audit_id"),
        );
        assert_eq!(props.field_names().actor(), "user");
        assert_eq!(props.field_names().event_id(), "audit_id");
        assert_eq!(props.field_names().action(), "action");
    }

    #[test]
    fn test_validate_rejects_blank_names() {
        let props = CommonProperties::new().with_processors(["log", "  "]);
        assert!(props.validate().is_err());

        let props = CommonProperties::new().with_default_stream("");
        assert!(props.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let props: CommonProperties = serde_json::from_str(
            r#"{"processors": ["event-id", "log"], "encoding": "hex"}"#,
        )
        .unwrap();
        assert_eq!(props.processors(), vec!["event-id", "log"]);
        assert_eq!(props.encoding(), Encoding::Hex);
        assert_eq!(props.default_stream(), "default");
        assert!(props.fail_on_missing_processors());
    }
}
