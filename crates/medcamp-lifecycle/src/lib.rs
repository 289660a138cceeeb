//! medcamp-lifecycle
//!
//! The camp and individual-test lifecycle engine. Pure rule modules
//! (`camp`, `test_entry`, `financial`) decide whether a transition is
//! allowed and what it writes; [`engine::Lifecycle`] loads records from a
//! [`medcamp_storage::store::DocumentStore`], applies a rule, and writes the
//! result back with a compare-and-swap on the record's ETag.

pub mod access;
pub mod analytics;
pub mod camp;
pub mod clinic;
pub mod codes;
pub mod engine;
pub mod error;
pub mod financial;
pub mod staff;
pub mod test_entry;
pub mod views;
