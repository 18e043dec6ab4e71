use serde::Deserialize;

use crate::domain::SortDir;
use crate::error::AppError;

/// `?sortDir=ASC|DESC` query accepted by every list endpoint.
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SortQuery {
    /// Sort by id, `ASC` (default) or `DESC`. Case-insensitive.
    #[param(example = "DESC")]
    pub sort_dir: Option<String>,
}

impl SortQuery {
    pub fn sort_dir(&self) -> Result<SortDir, AppError> {
        Ok(SortDir::parse(self.sort_dir.as_deref())?)
    }
}

/// Validate a required, trimmed name field (1-256 Unicode characters).
pub fn validate_name(field: &str, value: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > 256 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-256 characters"
        )));
    }
    Ok(())
}

/// Validate an optional-content text field (at most `max` characters).
pub fn validate_max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}
