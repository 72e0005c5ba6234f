use chrono::Utc;

use crate::domain::analytics::{AnalyticsEvent, EntityType, EventType};
use crate::domain::blog_post::{BlogPost, estimate_read_time};
use crate::domain::types::{BlogPostId, Slug, ViewCount};
use crate::forms::blog::CreateBlogPostPayload;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Page, Pagination};
use crate::repository::{
    AnalyticsWriter, BlogPostListQuery, BlogPostReader, BlogPostWriter, BusinessReader,
};
use crate::services::analytics::track_event;

use super::{ServiceError, ServiceResult, repository_failure, unique_slug};

/// Query string accepted by the blog listing.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct BlogListParams {
    pub category: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Published posts, newest first.
pub fn list_blog_posts<R>(params: &BlogListParams, repo: &R) -> ServiceResult<Page<BlogPost>>
where
    R: BlogPostReader,
{
    let pagination = Pagination::new(
        params.page.unwrap_or(1),
        params.limit.unwrap_or(DEFAULT_ITEMS_PER_PAGE),
    );

    let mut query = BlogPostListQuery::default().paginate(pagination.page, pagination.per_page);
    if let Some(category) = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        query = query.category(category);
    }

    let (total, items) = repo
        .list_blog_posts(query)
        .map_err(|e| repository_failure("list blog posts", e))?;

    Ok(Page {
        items,
        pagination: pagination.info(total),
    })
}

/// Returns a post by slug and counts the read.
pub fn get_blog_post<R>(slug: &str, repo: &R) -> ServiceResult<BlogPost>
where
    R: BlogPostReader + BlogPostWriter + AnalyticsWriter,
{
    let slug = Slug::new(slug).map_err(|_| ServiceError::NotFound)?;
    let mut post = match repo.get_blog_post_by_slug(&slug) {
        Ok(Some(post)) => post,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(repository_failure("load blog post", e)),
    };

    match repo.increment_blog_post_views(&post.id) {
        Ok(affected) if affected > 0 => post.view_count = post.view_count.incremented(),
        Ok(_) => {}
        Err(e) => log::warn!("Failed to count view of blog post {}: {e}", post.id),
    }

    let event = AnalyticsEvent::new(
        EntityType::Blog,
        post.id.as_str(),
        EventType::View,
        Utc::now().naive_utc(),
    );
    track_event(&event, repo);

    Ok(post)
}

pub fn create_blog_post<R>(payload: CreateBlogPostPayload, repo: &R) -> ServiceResult<BlogPost>
where
    R: BlogPostReader + BlogPostWriter + BusinessReader + AnalyticsWriter,
{
    let business_name = match &payload.business_id {
        None => None,
        Some(business_id) => match repo.get_business_by_id(business_id) {
            Ok(Some(business)) => Some(business.name.into_inner()),
            Ok(None) => {
                return Err(ServiceError::Form(format!(
                    "Business {business_id} does not exist"
                )));
            }
            Err(e) => return Err(repository_failure("load business", e)),
        },
    };

    let id = BlogPostId::generate();
    let slug = match payload.slug {
        Some(slug) => slug,
        None => {
            let base = Slug::from_text_or_id(payload.title.as_str(), "post", id.as_str())?;
            unique_slug(base, |candidate| {
                Ok(repo.get_blog_post_by_slug(candidate)?.is_some())
            })
            .map_err(|e| repository_failure("check blog post slug", e))?
        }
    };

    let now = Utc::now().naive_utc();
    let post = BlogPost {
        id,
        read_time: estimate_read_time(&payload.content),
        title: payload.title,
        slug,
        excerpt: payload.excerpt,
        content: payload.content,
        featured_image: payload.featured_image,
        images: payload.images,
        author: payload.author,
        author_id: payload.author_id,
        category: payload.category,
        tags: payload.tags,
        business_id: payload.business_id,
        business_name,
        is_published: payload.is_published,
        is_featured: payload.is_featured,
        view_count: ViewCount::default(),
        publish_date: payload.publish_date.unwrap_or(now),
        last_updated: now,
    };

    repo.create_blog_post(&post)
        .map_err(|e| repository_failure("create blog post", e))?;

    let event = AnalyticsEvent::new(EntityType::Blog, post.id.as_str(), EventType::Create, now);
    track_event(&event, repo);
    log::info!("Published blog post {} ({})", post.slug, post.id);

    Ok(post)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::types::{BlogTitle, BusinessId, PersonName};
    use crate::repository::test::TestRepository;

    fn payload(title: &str) -> CreateBlogPostPayload {
        CreateBlogPostPayload {
            title: BlogTitle::new(title).unwrap(),
            slug: None,
            excerpt: "A short teaser".into(),
            content: "word ".repeat(450),
            featured_image: None,
            images: vec![],
            author: PersonName::new("Melbourne Eats Team").unwrap(),
            author_id: None,
            category: "Success Stories".into(),
            tags: BTreeSet::from(["community".to_string()]),
            business_id: Some(BusinessId::new("8").unwrap()),
            is_published: true,
            is_featured: false,
            publish_date: None,
        }
    }

    #[test]
    fn lists_published_posts_newest_first() {
        let repo = TestRepository::with_sample();
        let page = list_blog_posts(&BlogListParams::default(), &repo).unwrap();
        assert_eq!(page.pagination.total, 6);
        assert_eq!(page.items[0].id.as_str(), "1");

        let params = BlogListParams {
            page: Some(2),
            limit: Some(4),
            ..Default::default()
        };
        let page = list_blog_posts(&params, &repo).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total_pages, 2);
    }

    #[test]
    fn filters_by_category() {
        let repo = TestRepository::with_sample();
        let params = BlogListParams {
            category: Some("Chef Spotlight".into()),
            ..Default::default()
        };
        let page = list_blog_posts(&params, &repo).unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].slug.as_str(), "dragon-palace-family-recipes");
    }

    #[test]
    fn reading_a_post_counts_the_view() {
        let repo = TestRepository::with_sample();
        let post = get_blog_post("dragon-palace-family-recipes", &repo).unwrap();
        assert_eq!(post.view_count.get(), 616);
        assert_eq!(repo.events().len(), 1);
        assert_eq!(get_blog_post("missing", &repo), Err(ServiceError::NotFound));
    }

    #[test]
    fn creates_post_with_derived_fields() {
        let repo = TestRepository::with_sample();
        let post = create_blog_post(payload("Sunset at the Waterfront"), &repo).unwrap();
        assert_eq!(post.slug.as_str(), "sunset-at-the-waterfront");
        assert_eq!(post.read_time, "3 min read");
        assert_eq!(post.business_name.as_deref(), Some("Waterfront Grill"));

        let again = create_blog_post(payload("Sunset at the Waterfront"), &repo).unwrap();
        assert_eq!(again.slug.as_str(), "sunset-at-the-waterfront-2");
    }

    #[test]
    fn unknown_business_is_rejected() {
        let repo = TestRepository::with_sample();
        let mut bad = payload("Ghost Kitchen");
        bad.business_id = Some(BusinessId::new("404").unwrap());
        assert!(matches!(
            create_blog_post(bad, &repo),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn explicit_slug_clash_is_a_conflict() {
        let repo = TestRepository::with_sample();
        let mut clash = payload("Another Story");
        clash.slug = Some(Slug::new("dragon-palace-family-recipes").unwrap());
        assert!(matches!(
            create_blog_post(clash, &repo),
            Err(ServiceError::Conflict(_))
        ));
    }
}
