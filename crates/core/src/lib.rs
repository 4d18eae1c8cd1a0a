//! Functional core for fxcal.
//!
//! Everything in this crate is pure: data types, traits at the I/O seams, and
//! functions with no side effects. The `fxcal` binary crate supplies the
//! implementations that talk to Redis, the browser and the network.

pub mod cache;
pub mod derive;
pub mod events;
pub mod scrape;
pub mod serde;
