mod error;
mod http_mapping;
mod range;
mod sorting;
mod types;
mod validation;

pub use error::{AcquisitionError, DateRangeError, ValidationError};
pub use http_mapping::{acquisition_error_to_status_code, validation_error_to_status_code};
pub use range::DateRange;
pub use sorting::{compare_events, group_events_by_date, sort_events};
pub use types::{EventDetail, EventRecord, Impact, Provenance, Variant};
pub use validation::{parse_date, parse_range, validate_range, RangeLimits};
