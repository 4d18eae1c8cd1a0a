pub mod database;
pub mod error;
pub mod events;
pub mod health;
pub mod root;

pub use error::AppError;
