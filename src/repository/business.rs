use chrono::NaiveDateTime;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use crate::domain::business::Business;
use crate::domain::types::{BusinessId, Slug};
use crate::models::business::{
    Business as DbBusiness, BusinessWithCategory, NewBusiness as DbNewBusiness,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{BusinessReader, BusinessWriter, DieselRepository};

impl BusinessReader for DieselRepository {
    fn list_businesses(&self) -> RepositoryResult<Vec<Business>> {
        use crate::schema::{businesses, categories};

        let mut conn = self.conn()?;

        let items = businesses::table
            .left_join(categories::table)
            .select((DbBusiness::as_select(), categories::name.nullable()))
            .order(sql::<BigInt>("businesses.rowid"))
            .load::<BusinessWithCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Business>, _>>()?;

        Ok(items)
    }

    fn get_business_by_id(&self, id: &BusinessId) -> RepositoryResult<Option<Business>> {
        use crate::schema::{businesses, categories};

        let mut conn = self.conn()?;

        let business = businesses::table
            .left_join(categories::table)
            .filter(businesses::id.eq(id.as_str()))
            .select((DbBusiness::as_select(), categories::name.nullable()))
            .first::<BusinessWithCategory>(&mut conn)
            .optional()?;

        let business = business.map(TryInto::try_into).transpose()?;
        Ok(business)
    }

    fn get_business_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Business>> {
        use crate::schema::{businesses, categories};

        let mut conn = self.conn()?;

        let business = businesses::table
            .left_join(categories::table)
            .filter(businesses::slug.eq(slug.as_str()))
            .select((DbBusiness::as_select(), categories::name.nullable()))
            .first::<BusinessWithCategory>(&mut conn)
            .optional()?;

        let business = business.map(TryInto::try_into).transpose()?;
        Ok(business)
    }

    fn count_businesses(&self) -> RepositoryResult<usize> {
        use crate::schema::businesses;

        let mut conn = self.conn()?;
        let total = businesses::table.count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}

impl BusinessWriter for DieselRepository {
    fn create_business(&self, business: &Business) -> RepositoryResult<usize> {
        use crate::schema::businesses;

        let mut conn = self.conn()?;
        let row = DbNewBusiness::try_from(business)?;

        let affected = diesel::insert_into(businesses::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_business(&self, business: &Business) -> RepositoryResult<usize> {
        use crate::schema::businesses;

        let mut conn = self.conn()?;
        let row = DbNewBusiness::try_from(business)?;

        let affected = diesel::update(businesses::table.find(business.id.as_str()))
            .set(&row)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn increment_business_views(&self, id: &BusinessId) -> RepositoryResult<usize> {
        use crate::schema::businesses;

        let mut conn = self.conn()?;

        let affected = diesel::update(businesses::table.find(id.as_str()))
            .set(businesses::view_count.eq(businesses::view_count + 1))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn deactivate_business(&self, id: &BusinessId, now: NaiveDateTime) -> RepositoryResult<usize> {
        use crate::schema::businesses;

        let mut conn = self.conn()?;

        let affected = diesel::update(businesses::table.find(id.as_str()))
            .set((
                businesses::is_active.eq(false),
                businesses::is_pending.eq(false),
                businesses::last_updated.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
