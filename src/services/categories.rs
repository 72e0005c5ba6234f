use std::collections::HashMap;

use chrono::Utc;

use crate::domain::analytics::{AnalyticsEvent, EntityType, EventType};
use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryId, Slug};
use crate::forms::categories::{AddCategoryFormPayload, SetCategoryParentFormPayload};
use crate::repository::{AnalyticsWriter, CategoryReader, CategoryWriter};
use crate::services::analytics::track_event;

use super::{ServiceError, ServiceResult, repository_failure, unique_slug};

/// Active categories by sort order, with live business counts.
pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    repo.list_categories(false)
        .map_err(|e| repository_failure("list categories", e))
}

/// Looks a category up by id first, then by slug.
pub fn get_category<R>(id_or_slug: &str, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader,
{
    if let Ok(id) = CategoryId::new(id_or_slug) {
        match repo.get_category_by_id(&id) {
            Ok(Some(category)) => return Ok(category),
            Ok(None) => {}
            Err(e) => return Err(repository_failure("load category", e)),
        }
    }

    let slug = Slug::new(id_or_slug).map_err(|_| ServiceError::NotFound)?;
    match repo.get_category_by_slug(&slug) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(repository_failure("load category", e)),
    }
}

fn require_parent<R>(parent_id: &CategoryId, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    match repo.get_category_by_id(parent_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ServiceError::Form(format!(
            "Parent category {parent_id} does not exist"
        ))),
        Err(e) => Err(repository_failure("load parent category", e)),
    }
}

pub fn create_category<R>(payload: AddCategoryFormPayload, repo: &R) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter + AnalyticsWriter,
{
    if let Some(parent_id) = &payload.parent_id {
        require_parent(parent_id, repo)?;
    }

    let id = CategoryId::generate();
    let slug = match payload.slug {
        // An explicit slug is taken as given; a clash is reported.
        Some(slug) => slug,
        None => {
            let base = Slug::from_text_or_id(payload.name.as_str(), "category", id.as_str())?;
            unique_slug(base, |candidate| {
                Ok(repo.get_category_by_slug(candidate)?.is_some())
            })
            .map_err(|e| repository_failure("check category slug", e))?
        }
    };

    let now = Utc::now().naive_utc();
    let category = NewCategory {
        id,
        name: payload.name,
        slug,
        icon: payload.icon,
        description: payload.description,
        parent_id: payload.parent_id,
        sort_order: payload.sort_order,
        created_at: now,
    };

    repo.create_category(&category)
        .map_err(|e| repository_failure("create category", e))?;

    let event = AnalyticsEvent::new(
        EntityType::Category,
        category.id.as_str(),
        EventType::Create,
        now,
    );
    track_event(&event, repo);

    match repo.get_category_by_id(&category.id) {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(ServiceError::Internal),
        Err(e) => Err(repository_failure("load category", e)),
    }
}

/// Re-parents a category, refusing changes that would make the tree loop.
pub fn set_category_parent<R>(
    id: &str,
    payload: SetCategoryParentFormPayload,
    repo: &R,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter + AnalyticsWriter,
{
    let id = CategoryId::new(id).map_err(|_| ServiceError::NotFound)?;
    let category = match repo.get_category_by_id(&id) {
        Ok(Some(category)) => category,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(repository_failure("load category", e)),
    };

    if let Some(parent_id) = &payload.parent_id {
        require_parent(parent_id, repo)?;

        let parents: HashMap<CategoryId, Option<CategoryId>> = repo
            .list_categories(true)
            .map_err(|e| repository_failure("list categories", e))?
            .into_iter()
            .map(|c| (c.id, c.parent_id))
            .collect();

        if category.would_cycle(parent_id, |c| parents.get(c).cloned()) {
            return Err(ServiceError::Form(format!(
                "Moving {} under {parent_id} would create a cycle",
                category.id
            )));
        }
    }

    let now = Utc::now().naive_utc();
    match repo.set_category_parent(&id, payload.parent_id.as_ref(), now) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => {}
        Err(e) => return Err(repository_failure("set category parent", e)),
    }

    let event = AnalyticsEvent::new(EntityType::Category, id.as_str(), EventType::Update, now);
    track_event(&event, repo);

    get_category(id.as_str(), repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CategoryIcon, CategoryName};
    use crate::repository::test::TestRepository;

    fn payload(name: &str, parent: Option<&str>) -> AddCategoryFormPayload {
        AddCategoryFormPayload {
            name: CategoryName::new(name).unwrap(),
            slug: None,
            icon: CategoryIcon::new("🚚").unwrap(),
            description: None,
            parent_id: parent.map(|p| CategoryId::new(p).unwrap()),
            sort_order: 10,
        }
    }

    fn move_under(parent: Option<&CategoryId>) -> SetCategoryParentFormPayload {
        SetCategoryParentFormPayload {
            parent_id: parent.cloned(),
        }
    }

    #[test]
    fn lists_active_categories_with_live_counts() {
        let repo = TestRepository::with_sample();
        let categories = list_categories(&repo).unwrap();
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[0].id.as_str(), "fine-dining");
        let cafes = categories.iter().find(|c| c.id.as_str() == "cafes").unwrap();
        assert_eq!(cafes.count.get(), 2);
    }

    #[test]
    fn finds_category_by_id_or_slug() {
        let repo = TestRepository::with_sample();
        assert_eq!(get_category("cafes", &repo).unwrap().name.as_str(), "Cafes");
        assert_eq!(
            get_category("bars-pubs", &repo).unwrap().name.as_str(),
            "Bars & Pubs"
        );
        assert_eq!(get_category("Not A Slug", &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn creates_child_category_with_derived_slug() {
        let repo = TestRepository::with_sample();
        let created = create_category(payload("Food Trucks", Some("fast-food")), &repo).unwrap();
        assert_eq!(created.slug.as_str(), "food-trucks");
        assert_eq!(created.parent_id.unwrap().as_str(), "fast-food");

        let again = create_category(payload("Food Trucks", None), &repo).unwrap();
        assert_eq!(again.slug.as_str(), "food-trucks-2");
    }

    #[test]
    fn rejects_missing_parent() {
        let repo = TestRepository::with_sample();
        let result = create_category(payload("Food Trucks", Some("nowhere")), &repo);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn explicit_slug_clash_is_a_conflict() {
        let repo = TestRepository::with_sample();
        let mut clash = payload("Coffee", None);
        clash.slug = Some(Slug::new("cafes").unwrap());
        let result = create_category(clash, &repo);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn rejects_parent_cycles() {
        let repo = TestRepository::with_sample();
        let dining = CategoryId::new("fine-dining").unwrap();
        let casual = CategoryId::new("casual-dining").unwrap();

        set_category_parent("casual-dining", move_under(Some(&dining)), &repo).unwrap();
        let result = set_category_parent("fine-dining", move_under(Some(&casual)), &repo);
        assert!(matches!(result, Err(ServiceError::Form(_))));

        let result = set_category_parent("fine-dining", move_under(Some(&dining)), &repo);
        assert!(matches!(result, Err(ServiceError::Form(_))));

        let top = set_category_parent("casual-dining", move_under(None), &repo).unwrap();
        assert!(top.parent_id.is_none());
    }
}
