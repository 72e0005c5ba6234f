//! Diesel row types and their conversions into domain entities.
//!
//! Structured values (images, hours, custom fields, tags) live in TEXT columns
//! as JSON.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::types::TypeConstraintError;

pub mod analytics;
pub mod blog_post;
pub mod business;
pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod custom_field;
pub mod review;
pub mod user;

/// Decodes a JSON column, reporting the column name on failure.
pub(crate) fn from_json<T: DeserializeOwned>(
    column: &'static str,
    raw: &str,
) -> Result<T, TypeConstraintError> {
    serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("{column} column: {e}")))
}

/// Decodes a nullable JSON column.
pub(crate) fn from_json_opt<T: DeserializeOwned>(
    column: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>, TypeConstraintError> {
    raw.map(|raw| from_json(column, raw)).transpose()
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}
