use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BlogPostId, BlogTitle, BusinessId, ImagePath, PersonName, Slug, UserId, ViewCount,
};

/// Editorial story, usually about one business.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: BlogPostId,
    pub title: BlogTitle,
    pub slug: Slug,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<ImagePath>,
    pub images: Vec<ImagePath>,
    pub author: PersonName,
    pub author_id: Option<UserId>,
    pub category: String,
    pub tags: BTreeSet<String>,
    pub business_id: Option<BusinessId>,
    pub business_name: Option<String>,
    pub read_time: String,
    pub is_published: bool,
    pub is_featured: bool,
    pub view_count: ViewCount,
    pub publish_date: NaiveDateTime,
    pub last_updated: NaiveDateTime,
}

/// Words per minute used to estimate reading time.
const WORDS_PER_MINUTE: usize = 200;

/// Estimated reading time label, e.g. `"3 min read"`.
pub fn estimate_read_time(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}
