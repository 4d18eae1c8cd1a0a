//! Key-value store backends.
//!
//! Concrete implementations of `fxcal_core::cache::KeyValueStore`, selected
//! at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `memory` (default): in-process LRU store, lost on restart
//! - `redis`: Redis store shared between instances
//!
//! These features are mutually exclusive.

#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!(
    "Features 'memory' and 'redis' are mutually exclusive. \
    Enable only one store backend at a time."
);

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!(
    "No store backend selected. Enable 'memory' or 'redis' feature. \
    Example: cargo build -p fxcal --no-default-features --features redis"
);

#[cfg(any(feature = "memory", test))]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

#[cfg(any(feature = "memory", test))]
pub use memory::MemoryStore;

#[cfg(feature = "redis")]
pub use redis_impl::RedisStore;
