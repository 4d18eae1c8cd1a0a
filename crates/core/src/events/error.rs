use thiserror::Error;

use crate::scrape::{ScrapeError, ScrapeStage};

/// Errors that can occur when constructing a date range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Invalid date range: start date must be before or equal to end date")]
    InvalidRange,
}

/// Errors raised while validating a requested date range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid date format. Use YYYY-MM-DD: {0}")]
    InvalidFormat(String),
    #[error("Start date must be before or equal to end date")]
    InvalidRange,
    #[error("Date range cannot exceed {max_days} days")]
    RangeTooLong { max_days: i64 },
    #[error("Dates cannot be more than {max_days} days in the past or future")]
    OutOfWindow { max_days: i64 },
}

impl From<DateRangeError> for ValidationError {
    fn from(err: DateRangeError) -> Self {
        match err {
            DateRangeError::InvalidRange => ValidationError::InvalidRange,
        }
    }
}

/// Errors surfaced by the acquisition orchestrator.
///
/// The orchestrator only fails when it has nothing at all to return.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Scraping failed at {stage} and no data in database: {cause}")]
    ScrapeUnavailable { stage: ScrapeStage, cause: String },
    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<ScrapeError> for AcquisitionError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::Unavailable { stage, cause } => {
                AcquisitionError::ScrapeUnavailable { stage, cause }
            }
        }
    }
}
