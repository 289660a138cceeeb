//! medcamp-audit
//!
//! Application-level audit events for camp and test transitions, written to
//! the structured log stream.

pub mod actions;
pub mod events;
