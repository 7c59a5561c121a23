//! HTTP request handlers, organized by domain.

pub mod booking;
pub mod configuration;
pub mod health;
pub mod package;
pub mod schedule;
pub mod session;

use validator::Validate;

use studiohub_core::error::AppError;

use crate::error::ApiError;

/// Run `validator` rules on a request body.
pub(crate) fn validate_body<T: Validate>(body: &T) -> Result<(), ApiError> {
    body.validate()
        .map_err(|e| ApiError(AppError::validation(e.to_string())))
}
