use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::dsl::{count_star, sql};
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use crate::db::DbConnection;
use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryId, Slug};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

/// Number of active businesses per category id.
fn active_counts(conn: &mut DbConnection) -> RepositoryResult<HashMap<String, i64>> {
    use crate::schema::businesses;

    let counts = businesses::table
        .filter(businesses::is_active.eq(true))
        .group_by(businesses::category_id)
        .select((businesses::category_id, count_star()))
        .load::<(String, i64)>(conn)?;

    Ok(counts.into_iter().collect())
}

fn with_count(
    conn: &mut DbConnection,
    category: Option<DbCategory>,
) -> RepositoryResult<Option<Category>> {
    use crate::schema::businesses;

    let Some(category) = category else {
        return Ok(None);
    };

    let count = businesses::table
        .filter(businesses::is_active.eq(true))
        .filter(businesses::category_id.eq(&category.id))
        .count()
        .get_result::<i64>(conn)?;

    Ok(Some((category, count).try_into()?))
}

impl CategoryReader for DieselRepository {
    fn list_categories(&self, include_inactive: bool) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let mut query = categories::table.into_boxed::<diesel::sqlite::Sqlite>();
        if !include_inactive {
            query = query.filter(categories::is_active.eq(true));
        }

        let rows = query
            .order((
                categories::sort_order.asc(),
                sql::<BigInt>("categories.rowid"),
            ))
            .load::<DbCategory>(&mut conn)?;

        let counts = active_counts(&mut conn)?;

        let items = rows
            .into_iter()
            .map(|row| {
                let count = counts.get(&row.id).copied().unwrap_or(0);
                (row, count).try_into()
            })
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: &CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .find(id.as_str())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        with_count(&mut conn, category)
    }

    fn get_category_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::slug.eq(slug.as_str()))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        with_count(&mut conn, category)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let affected = diesel::insert_into(categories::table)
            .values(db_category)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_category_parent(
        &self,
        id: &CategoryId,
        parent_id: Option<&CategoryId>,
        now: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::update(categories::table.find(id.as_str()))
            .set((
                categories::parent_id.eq(parent_id.map(CategoryId::as_str)),
                categories::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
