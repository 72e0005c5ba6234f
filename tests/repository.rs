use chrono::Utc;
use pushkind_directory::domain::analytics::{AnalyticsEvent, EntityType, EventType};
use pushkind_directory::domain::business::{BusinessPatch, NewBusiness};
use pushkind_directory::domain::review::{NewReview, ReviewResponse};
use pushkind_directory::domain::types::{
    Address, BusinessId, BusinessName, CategoryId, PersonName, ReviewContent, ReviewId,
    ReviewRating, Slug, UserId,
};
use pushkind_directory::repository::{
    AnalyticsReader, AnalyticsWriter, BlogPostListQuery, BlogPostReader, BlogPostWriter,
    BusinessReader, BusinessWriter, CategoryReader, CategoryWriter, ReviewReader, ReviewWriter,
    SavedBusinessReader, SavedBusinessWriter,
};
use pushkind_directory::repository::errors::RepositoryError;

mod common;

fn review(business_id: &str, user_id: &str, user_name: &str, rating: i32) -> NewReview {
    NewReview {
        id: ReviewId::generate(),
        business_id: BusinessId::new(business_id).unwrap(),
        user_id: UserId::new(user_id).unwrap(),
        user_name: PersonName::new(user_name).unwrap(),
        rating: ReviewRating::new(rating).unwrap(),
        title: None,
        content: ReviewContent::new("Lovely evening").unwrap(),
        images: vec![],
        metadata: None,
        date_created: Utc::now().naive_utc(),
    }
}

fn business_id(id: &str) -> BusinessId {
    BusinessId::new(id).unwrap()
}

#[test]
fn seeded_business_round_trips_with_resolved_category() {
    let test_db = common::TestDb::seeded();
    let repo = test_db.repo();

    let bistro = repo
        .get_business_by_id(&business_id("1"))
        .unwrap()
        .expect("sample business should exist");
    assert_eq!(bistro.name.as_str(), "The Local Bistro");
    assert_eq!(bistro.category, "Fine Dining");
    assert_eq!(bistro.rating, 4.8);
    assert!(bistro.custom_fields.typed.contains_key("cuisineType"));

    let by_slug = repo
        .get_business_by_slug(&Slug::new("the-local-bistro").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(by_slug, bistro);
}

#[test]
fn duplicate_business_slug_is_a_conflict() {
    let test_db = common::TestDb::seeded();
    let repo = test_db.repo();

    let business = NewBusiness::new(
        BusinessName::new("The Local Bistro").unwrap(),
        CategoryId::new("fine-dining").unwrap(),
        Address::new("2 Other St").unwrap(),
    )
    .into_business(
        BusinessId::generate(),
        Slug::new("the-local-bistro").unwrap(),
        "Fine Dining".into(),
        Utc::now().naive_utc(),
    );

    let result = repo.create_business(&business);
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
}

#[test]
fn update_and_soft_delete_keep_the_record() {
    let test_db = common::TestDb::seeded();
    let repo = test_db.repo();
    let id = business_id("6");
    let now = Utc::now().naive_utc();

    let mut business = repo.get_business_by_id(&id).unwrap().unwrap();
    BusinessPatch {
        short_description: Some("Smash burgers".into()),
        is_featured: Some(true),
        ..Default::default()
    }
    .apply(&mut business, now);
    assert_eq!(repo.update_business(&business).unwrap(), 1);

    assert_eq!(repo.deactivate_business(&id, now).unwrap(), 1);
    let stored = repo.get_business_by_id(&id).unwrap().unwrap();
    assert!(!stored.is_active);
    assert!(stored.is_featured);
    assert_eq!(stored.short_description.as_deref(), Some("Smash burgers"));

    assert_eq!(repo.increment_business_views(&id).unwrap(), 1);
    let viewed = repo.get_business_by_id(&id).unwrap().unwrap();
    assert_eq!(viewed.view_count.get(), 1);
}

#[test]
fn reviews_recompute_business_rating() {
    let test_db = common::TestDb::seeded();
    let repo = test_db.repo();
    let id = business_id("2");

    repo.create_review(&review("2", "1", "Admin User", 5)).unwrap();
    repo.create_review(&review("2", "2", "Business Owner", 4)).unwrap();
    let last = review("2", "3", "Regular User", 4);
    repo.create_review(&last).unwrap();

    let business = repo.get_business_by_id(&id).unwrap().unwrap();
    assert_eq!(business.rating, 4.33);
    assert_eq!(business.review_count, 3);
    assert_eq!(repo.list_reviews_for_business(&id).unwrap().len(), 3);

    repo.delete_review(&last.id).unwrap();
    let business = repo.get_business_by_id(&id).unwrap().unwrap();
    assert_eq!(business.rating, 4.5);
    assert_eq!(business.review_count, 2);
}

#[test]
fn one_review_per_user_per_business() {
    let test_db = common::TestDb::seeded();
    let repo = test_db.repo();

    repo.create_review(&review("3", "3", "Regular User", 5)).unwrap();
    let again = repo.create_review(&review("3", "3", "Regular User", 2));
    assert!(matches!(again, Err(RepositoryError::Conflict(_))));
}

#[test]
fn review_votes_and_responses_are_stored() {
    let test_db = common::TestDb::seeded();
    let repo = test_db.repo();
    let new = review("4", "3", "Regular User", 5);
    repo.create_review(&new).unwrap();

    repo.mark_review_helpful(&new.id).unwrap();
    repo.mark_review_helpful(&new.id).unwrap();
    repo.set_review_response(
        &new.id,
        &ReviewResponse {
            content: "Thank you!".into(),
            author_name: PersonName::new("Chef Wong").unwrap(),
            date_created: Utc::now().naive_utc(),
        },
    )
    .unwrap();

    let stored = repo.get_review_by_id(&new.id).unwrap().unwrap();
    assert_eq!(stored.is_helpful.get(), 2);
    assert_eq!(stored.response.unwrap().author_name.as_str(), "Chef Wong");
}

#[test]
fn category_counts_follow_active_businesses() {
    let test_db = common::TestDb::seeded();
    let repo = test_db.repo();
    let cafes = CategoryId::new("cafes").unwrap();

    let before = repo.get_category_by_id(&cafes).unwrap().unwrap();
    assert_eq!(before.count.get(), 2);

    repo.deactivate_business(&business_id("3"), Utc::now().naive_utc())
        .unwrap();
    let after = repo.get_category_by_id(&cafes).unwrap().unwrap();
    assert_eq!(after.count.get(), 1);

    let listed = repo.list_categories(false).unwrap();
    assert_eq!(listed.len(), 6);
    assert_eq!(listed[0].id.as_str(), "fine-dining");
}

#[test]
fn category_parent_can_be_set_and_cleared() {
    let test_db = common::TestDb::seeded();
    let repo = test_db.repo();
    let casual = CategoryId::new("casual-dining").unwrap();
    let fast = CategoryId::new("fast-food").unwrap();
    let now = Utc::now().naive_utc();

    repo.set_category_parent(&fast, Some(&casual), now).unwrap();
    let child = repo.get_category_by_id(&fast).unwrap().unwrap();
    assert_eq!(child.parent_id, Some(casual));

    repo.set_category_parent(&fast, None, now).unwrap();
    let top = repo.get_category_by_id(&fast).unwrap().unwrap();
    assert!(top.parent_id.is_none());
}

#[test]
fn blog_posts_page_newest_first() {
    let test_db = common::TestDb::seeded();
    let repo = test_db.repo();

    let (total, first) = repo
        .list_blog_posts(BlogPostListQuery::default().paginate(1, 4))
        .unwrap();
    assert_eq!(total, 6);
    assert_eq!(first.len(), 4);
    assert_eq!(first[0].id.as_str(), "1");
    assert!(first.windows(2).all(|w| w[0].publish_date >= w[1].publish_date));

    let (_, second) = repo
        .list_blog_posts(BlogPostListQuery::default().paginate(2, 4))
        .unwrap();
    assert_eq!(second.len(), 2);

    let (total, spotlight) = repo
        .list_blog_posts(BlogPostListQuery::default().category("Chef Spotlight"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(spotlight[0].business_name.as_deref(), Some("Dragon Palace"));

    let post = &spotlight[0];
    repo.increment_blog_post_views(&post.id).unwrap();
    let stored = repo.get_blog_post_by_slug(&post.slug).unwrap().unwrap();
    assert_eq!(stored.view_count.get(), post.view_count.get() + 1);
}

#[test]
fn saved_businesses_are_idempotent_and_newest_first() {
    let test_db = common::TestDb::seeded();
    let repo = test_db.repo();
    let user = UserId::new("3").unwrap();
    let earlier = Utc::now().naive_utc() - chrono::Duration::minutes(5);
    let later = Utc::now().naive_utc();

    assert_eq!(repo.save_business(&user, &business_id("1"), earlier).unwrap(), 1);
    assert_eq!(repo.save_business(&user, &business_id("5"), later).unwrap(), 1);
    assert_eq!(repo.save_business(&user, &business_id("5"), later).unwrap(), 0);

    let saved = repo.list_saved_businesses(&user).unwrap();
    let ids: Vec<&str> = saved.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["5", "1"]);

    assert_eq!(repo.unsave_business(&user, &business_id("1")).unwrap(), 1);
    assert_eq!(repo.unsave_business(&user, &business_id("1")).unwrap(), 0);
}

#[test]
fn analytics_summary_counts_by_event_type() {
    let test_db = common::TestDb::seeded();
    let repo = test_db.repo();
    let now = Utc::now().naive_utc();

    for event_type in [
        EventType::View,
        EventType::View,
        EventType::Click,
        EventType::Save,
        EventType::Update,
    ] {
        repo.record_event(&AnalyticsEvent::new(EntityType::Business, "1", event_type, now))
            .unwrap();
    }
    repo.record_event(
        &AnalyticsEvent::new(EntityType::Blog, "1", EventType::View, now)
            .with_user(UserId::new("ghost").unwrap())
            .with_metadata("source", "newsletter"),
    )
    .unwrap();

    let summary = repo.analytics_summary(EntityType::Business, "1").unwrap();
    assert_eq!(summary.views, 2);
    assert_eq!(summary.clicks, 1);
    assert_eq!(summary.saves, 1);
    assert_eq!(summary.shares, 0);

    let blog = repo.analytics_summary(EntityType::Blog, "1").unwrap();
    assert_eq!(blog.views, 1);
}
