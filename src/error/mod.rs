//! Error and failure types.
//!
//! Two disjoint classes live here. Validation failures are data: raw
//! [`RawFailure`]s from the rule engine and the public [`FieldError`]s they
//! map to. [`MappingError`] and [`RuleError`](crate::RuleError) are real
//! errors: they mean the validation setup itself is broken.

mod field_error;
mod mapping_error;
mod raw_failure;

pub use field_error::{ApiError, FieldError, VALIDATION_FAILED};
pub use mapping_error::MappingError;
pub use raw_failure::{FieldFailure, RawFailure, RawFailures};

use crate::rules::RuleError;

/// Any error raised while validating and mapping in one step.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}
