//! medcamp-storage
//!
//! The document store boundary. Records are JSON objects addressed by
//! tree-shaped keys; writes can be conditioned on an ETag or on absence.
//! Backed by S3 in production and by an in-memory map in tests.

pub mod client;
pub mod error;
pub mod json;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod store;
