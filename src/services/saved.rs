use chrono::Utc;

use crate::domain::analytics::{AnalyticsEvent, EntityType, EventType};
use crate::domain::business::Business;
use crate::domain::types::{BusinessId, UserId};
use crate::repository::{
    AnalyticsWriter, BusinessReader, SavedBusinessReader, SavedBusinessWriter, UserReader,
};
use crate::services::analytics::track_event;

use super::{ServiceError, ServiceResult, repository_failure};

fn require_user<R>(id: &str, repo: &R) -> ServiceResult<UserId>
where
    R: UserReader,
{
    let id = UserId::new(id).map_err(|_| ServiceError::NotFound)?;
    match repo.get_user_by_id(&id) {
        Ok(Some(user)) => Ok(user.id),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(repository_failure("load user", e)),
    }
}

/// Businesses the user saved, most recent first.
pub fn list_saved<R>(user_id: &str, repo: &R) -> ServiceResult<Vec<Business>>
where
    R: UserReader + SavedBusinessReader,
{
    let user_id = require_user(user_id, repo)?;
    repo.list_saved_businesses(&user_id)
        .map_err(|e| repository_failure("list saved businesses", e))
}

/// Saves a business for the user. Saving twice is not an error.
pub fn save_business<R>(user_id: &str, business_id: &str, repo: &R) -> ServiceResult<()>
where
    R: UserReader + BusinessReader + SavedBusinessWriter + AnalyticsWriter,
{
    let user_id = require_user(user_id, repo)?;
    let business_id = BusinessId::new(business_id).map_err(|_| ServiceError::NotFound)?;
    match repo.get_business_by_id(&business_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(repository_failure("load business", e)),
    }

    let now = Utc::now().naive_utc();
    let inserted = repo
        .save_business(&user_id, &business_id, now)
        .map_err(|e| repository_failure("save business", e))?;

    if inserted > 0 {
        let event = AnalyticsEvent::new(
            EntityType::Business,
            business_id.as_str(),
            EventType::Save,
            now,
        )
        .with_user(user_id);
        track_event(&event, repo);
    }
    Ok(())
}

pub fn unsave_business<R>(user_id: &str, business_id: &str, repo: &R) -> ServiceResult<()>
where
    R: UserReader + SavedBusinessWriter,
{
    let user_id = require_user(user_id, repo)?;
    let business_id = BusinessId::new(business_id).map_err(|_| ServiceError::NotFound)?;
    match repo.unsave_business(&user_id, &business_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => Err(repository_failure("unsave business", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::TestRepository;

    #[test]
    fn saving_is_idempotent() {
        let repo = TestRepository::with_sample();
        save_business("3", "5", &repo).unwrap();
        save_business("3", "5", &repo).unwrap();

        let saved = list_saved("3", &repo).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name.as_str(), "The Crafty Pint");
        assert_eq!(repo.events().len(), 1);
    }

    #[test]
    fn unsave_removes_and_then_reports_missing() {
        let repo = TestRepository::with_sample();
        save_business("3", "1", &repo).unwrap();
        unsave_business("3", "1", &repo).unwrap();
        assert!(list_saved("3", &repo).unwrap().is_empty());
        assert_eq!(
            unsave_business("3", "1", &repo),
            Err(ServiceError::NotFound)
        );
    }

    #[test]
    fn unknown_user_or_business_is_not_found() {
        let repo = TestRepository::with_sample();
        assert_eq!(save_business("42", "1", &repo), Err(ServiceError::NotFound));
        assert_eq!(save_business("3", "42", &repo), Err(ServiceError::NotFound));
        assert_eq!(list_saved("42", &repo), Err(ServiceError::NotFound));
    }
}
