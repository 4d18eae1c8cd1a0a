//! Pure functions for mapping acquisition errors to HTTP status codes.

use super::{AcquisitionError, ValidationError};

/// Maps an [`AcquisitionError`] to an HTTP status code.
///
/// - `Validation` -> 400 (Bad Request)
/// - `ScrapeUnavailable` -> 500 (Internal Server Error)
/// - `Task` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use fxcal_core::events::{acquisition_error_to_status_code, AcquisitionError, ValidationError};
///
/// let error = AcquisitionError::Validation(ValidationError::InvalidRange);
/// assert_eq!(acquisition_error_to_status_code(&error), 400);
/// ```
pub fn acquisition_error_to_status_code(error: &AcquisitionError) -> u16 {
    match error {
        AcquisitionError::Validation(_) => 400,
        AcquisitionError::ScrapeUnavailable { .. } => 500,
        AcquisitionError::Task(_) => 500,
    }
}

/// Maps a [`ValidationError`] to an HTTP status code.
pub fn validation_error_to_status_code(_error: &ValidationError) -> u16 {
    400
}
