//! Content-addressed CV storage.

pub mod handlers;
pub mod hashing;
pub mod memory;
pub mod metadata;
pub mod pg_store;
pub mod store;
