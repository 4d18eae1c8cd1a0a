//! In-memory store backend for single-instance deployments and tests.

mod store;

pub use store::MemoryStore;
