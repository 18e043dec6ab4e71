pub mod auth;
pub mod json;
pub mod query;

use crate::error::AppError;

/// Turn the text of an extractor rejection into an `INVALID_ARGUMENT` error.
fn malformed(detail: String) -> AppError {
    tracing::debug!(%detail, "Malformed request input");
    AppError::Validation(detail)
}
