//! medcamp-core
//!
//! Domain types, the static test catalog, and store key conventions shared
//! by the camp and individual-test workflows. No AWS SDK dependency.

pub mod catalog;
pub mod error;
pub mod models;
pub mod store_keys;
