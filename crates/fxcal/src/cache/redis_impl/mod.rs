//! Redis store backend.
//!
//! Shares the day cache between instances and keeps it across restarts.
//! Keys written by earlier deployments stay readable.

mod error;
mod store;

pub use store::RedisStore;
