use diesel::prelude::*;

use crate::domain::blog_post::BlogPost;
use crate::domain::types::{BlogPostId, Slug};
use crate::models::blog_post::BlogPost as DbBlogPost;
use crate::repository::errors::RepositoryResult;
use crate::repository::{BlogPostListQuery, BlogPostReader, BlogPostWriter, DieselRepository};

impl BlogPostReader for DieselRepository {
    fn list_blog_posts(
        &self,
        query: BlogPostListQuery,
    ) -> RepositoryResult<(usize, Vec<BlogPost>)> {
        use crate::schema::blog_posts;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = blog_posts::table.into_boxed::<diesel::sqlite::Sqlite>();
            if !query.include_unpublished {
                items = items.filter(blog_posts::is_published.eq(true));
            }
            if let Some(category) = &query.category {
                items = items.filter(blog_posts::category.eq(category.clone()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset() as i64)
                .limit(pagination.per_page as i64);
        }

        let items = items
            .order(blog_posts::publish_date.desc())
            .load::<DbBlogPost>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<BlogPost>, _>>()?;

        Ok((total, items))
    }

    fn get_blog_post_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<BlogPost>> {
        use crate::schema::blog_posts;

        let mut conn = self.conn()?;

        let post = blog_posts::table
            .filter(blog_posts::slug.eq(slug.as_str()))
            .first::<DbBlogPost>(&mut conn)
            .optional()?;

        let post = post.map(TryInto::try_into).transpose()?;
        Ok(post)
    }
}

impl BlogPostWriter for DieselRepository {
    fn create_blog_post(&self, post: &BlogPost) -> RepositoryResult<usize> {
        use crate::schema::blog_posts;

        let mut conn = self.conn()?;
        let row = DbBlogPost::try_from(post)?;

        let affected = diesel::insert_into(blog_posts::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn increment_blog_post_views(&self, id: &BlogPostId) -> RepositoryResult<usize> {
        use crate::schema::blog_posts;

        let mut conn = self.conn()?;

        let affected = diesel::update(blog_posts::table.find(id.as_str()))
            .set(blog_posts::view_count.eq(blog_posts::view_count + 1))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
