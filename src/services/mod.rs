//! Business logic behind the HTTP routes.
//!
//! Services are plain functions generic over the repository traits they need,
//! so tests can run them against the in-memory repository.

use crate::domain::types::Slug;
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub use errors::{ServiceError, ServiceResult};

pub mod analytics;
pub mod blog;
pub mod businesses;
pub mod categories;
pub mod content;
pub mod errors;
pub mod reviews;
pub mod saved;

/// Maps a repository failure to the error returned to the caller.
///
/// Unexpected failures are logged here so that callers only decide the
/// response.
fn repository_failure(action: &str, error: RepositoryError) -> ServiceError {
    match error {
        RepositoryError::NotFound => ServiceError::NotFound,
        RepositoryError::Conflict(message) => ServiceError::Conflict(message),
        other => {
            log::error!("Failed to {action}: {other}");
            ServiceError::Internal
        }
    }
}

/// First free slug among `base`, `base-2`, `base-3` and so on.
fn unique_slug<F>(base: Slug, mut taken: F) -> RepositoryResult<Slug>
where
    F: FnMut(&Slug) -> RepositoryResult<bool>,
{
    if !taken(&base)? {
        return Ok(base);
    }
    let mut suffix = 2;
    loop {
        let candidate = base.with_suffix(suffix);
        if !taken(&candidate)? {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_slug_appends_first_free_suffix() {
        let taken = ["joes-cafe", "joes-cafe-2"];
        let slug = unique_slug(Slug::new("joes-cafe").unwrap(), |s| {
            Ok(taken.contains(&s.as_str()))
        })
        .unwrap();
        assert_eq!(slug.as_str(), "joes-cafe-3");
    }

    #[test]
    fn repository_conflicts_surface_as_conflicts() {
        let error = repository_failure("save", RepositoryError::Conflict("slug".into()));
        assert_eq!(error, ServiceError::Conflict("slug".into()));
    }
}
