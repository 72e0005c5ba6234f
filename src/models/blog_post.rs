use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::blog_post::BlogPost as DomainBlogPost;
use crate::domain::types::{
    BlogPostId, BlogTitle, BusinessId, ImagePath, PersonName, Slug, TypeConstraintError, UserId,
    ViewCount,
};
use crate::models::{from_json, to_json};

/// Diesel model representing the `blog_posts` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::blog_posts)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub images: String,
    pub author: String,
    pub author_id: Option<String>,
    pub category: String,
    pub tags: String,
    pub business_id: Option<String>,
    pub business_name: Option<String>,
    pub read_time: String,
    pub is_published: bool,
    pub is_featured: bool,
    pub view_count: i32,
    pub publish_date: NaiveDateTime,
    pub last_updated: NaiveDateTime,
}

impl TryFrom<BlogPost> for DomainBlogPost {
    type Error = TypeConstraintError;

    fn try_from(post: BlogPost) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BlogPostId::new(post.id)?,
            title: BlogTitle::new(post.title)?,
            slug: Slug::new(post.slug)?,
            excerpt: post.excerpt,
            content: post.content,
            featured_image: post.featured_image.map(ImagePath::new).transpose()?,
            images: from_json("images", &post.images)?,
            author: PersonName::new(post.author)?,
            author_id: post.author_id.map(UserId::new).transpose()?,
            category: post.category,
            tags: from_json("tags", &post.tags)?,
            business_id: post.business_id.map(BusinessId::new).transpose()?,
            business_name: post.business_name,
            read_time: post.read_time,
            is_published: post.is_published,
            is_featured: post.is_featured,
            view_count: ViewCount::new(post.view_count)?,
            publish_date: post.publish_date,
            last_updated: post.last_updated,
        })
    }
}

impl TryFrom<&DomainBlogPost> for BlogPost {
    type Error = serde_json::Error;

    fn try_from(post: &DomainBlogPost) -> Result<Self, Self::Error> {
        Ok(Self {
            id: post.id.to_string(),
            title: post.title.to_string(),
            slug: post.slug.to_string(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            featured_image: post.featured_image.as_ref().map(ToString::to_string),
            images: to_json(&post.images)?,
            author: post.author.to_string(),
            author_id: post.author_id.as_ref().map(ToString::to_string),
            category: post.category.clone(),
            tags: to_json(&post.tags)?,
            business_id: post.business_id.as_ref().map(ToString::to_string),
            business_name: post.business_name.clone(),
            read_time: post.read_time.clone(),
            is_published: post.is_published,
            is_featured: post.is_featured,
            view_count: post.view_count.get(),
            publish_date: post.publish_date,
            last_updated: post.last_updated,
        })
    }
}
