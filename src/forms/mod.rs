//! Request payload validation.
//!
//! Each form is deserialized from the request body, checked with `validator`
//! and converted into a typed payload for the service layer.

pub mod analytics;
pub mod blog;
pub mod businesses;
pub mod categories;
pub mod reviews;

/// Treats a missing or whitespace-only optional field as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
