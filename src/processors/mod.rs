//! Built-in processor implementations
//!
//! Registered by name in [`PluginRegistry::new`](crate::PluginRegistry::new):
//! `log`, `event-id`, `timestamp`, and `json-lines`. Enrichment processors
//! (`event-id`, `timestamp`) are reversible; emission processors (`log`,
//! `json-lines`) are not and are skipped during rollback.

mod event_id;
mod json_lines;
mod log;
mod timestamp;

pub use event_id::EventIdProcessor;
pub use json_lines::{JsonLinesProcessor, PATH_KEY};
pub use log::LogProcessor;
pub use timestamp::TimestampProcessor;
