use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::review::{NewReview, Review, ReviewResponse};
use crate::domain::types::{BusinessId, Rating, ReviewId, ReviewRating};
use crate::models::review::{NewReview as DbNewReview, Review as DbReview};
use crate::models::to_json;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ReviewReader, ReviewWriter};

/// Sets a business's rating and review count from its stored reviews.
fn recompute_business_rating(
    conn: &mut SqliteConnection,
    business_id: &str,
) -> RepositoryResult<()> {
    use crate::schema::{businesses, reviews};

    let scores = reviews::table
        .filter(reviews::business_id.eq(business_id))
        .select(reviews::rating)
        .load::<i32>(conn)?
        .into_iter()
        .map(ReviewRating::new)
        .collect::<Result<Vec<_>, _>>()?;

    let rating = Rating::average_of(&scores);

    diesel::update(businesses::table.find(business_id))
        .set((
            businesses::rating.eq(rating.get()),
            businesses::review_count.eq(scores.len() as i32),
        ))
        .execute(conn)?;

    Ok(())
}

impl ReviewReader for DieselRepository {
    fn list_reviews_for_business(&self, business_id: &BusinessId) -> RepositoryResult<Vec<Review>> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let items = reviews::table
            .filter(reviews::business_id.eq(business_id.as_str()))
            .order(reviews::date_created.desc())
            .load::<DbReview>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Review>, _>>()?;

        Ok(items)
    }

    fn get_review_by_id(&self, id: &ReviewId) -> RepositoryResult<Option<Review>> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let review = reviews::table
            .find(id.as_str())
            .first::<DbReview>(&mut conn)
            .optional()?;

        let review = review.map(TryInto::try_into).transpose()?;
        Ok(review)
    }
}

impl ReviewWriter for DieselRepository {
    fn create_review(&self, review: &NewReview) -> RepositoryResult<usize> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let row = DbNewReview::try_from(review)?;

        let affected = conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::insert_into(reviews::table)
                .values(&row)
                .execute(conn)?;
            recompute_business_rating(conn, &row.business_id)?;
            Ok(affected)
        })?;

        Ok(affected)
    }

    fn delete_review(&self, id: &ReviewId) -> RepositoryResult<usize> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let affected = conn.transaction::<_, RepositoryError, _>(|conn| {
            let business_id = reviews::table
                .find(id.as_str())
                .select(reviews::business_id)
                .first::<String>(conn)
                .optional()?;

            let Some(business_id) = business_id else {
                return Ok(0);
            };

            let affected = diesel::delete(reviews::table.find(id.as_str())).execute(conn)?;
            recompute_business_rating(conn, &business_id)?;
            Ok(affected)
        })?;

        Ok(affected)
    }

    fn mark_review_helpful(&self, id: &ReviewId) -> RepositoryResult<usize> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let affected = diesel::update(reviews::table.find(id.as_str()))
            .set(reviews::is_helpful.eq(reviews::is_helpful + 1))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_review_response(
        &self,
        id: &ReviewId,
        response: &ReviewResponse,
    ) -> RepositoryResult<usize> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let encoded = to_json(response)?;

        let affected = diesel::update(reviews::table.find(id.as_str()))
            .set((
                reviews::response.eq(Some(encoded)),
                reviews::date_updated.eq(Some(response.date_created)),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
