use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::business::Business;
use crate::domain::types::{BusinessId, UserId};
use crate::domain::user::User;
use crate::models::business::{Business as DbBusiness, BusinessWithCategory};
use crate::models::user::{SavedBusiness as DbSavedBusiness, User as DbUser};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    DieselRepository, SavedBusinessReader, SavedBusinessWriter, UserReader, UserWriter,
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: &UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .find(id.as_str())
            .first::<DbUser>(&mut conn)
            .optional()?;

        let user = user.map(TryInto::try_into).transpose()?;
        Ok(user)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, user: &User) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let affected = diesel::insert_into(users::table)
            .values(DbUser::from(user))
            .execute(&mut conn)?;

        Ok(affected)
    }
}

impl SavedBusinessReader for DieselRepository {
    fn list_saved_businesses(&self, user_id: &UserId) -> RepositoryResult<Vec<Business>> {
        use crate::schema::{businesses, categories, saved_businesses};

        let mut conn = self.conn()?;

        let items = saved_businesses::table
            .inner_join(businesses::table.left_join(categories::table))
            .filter(saved_businesses::user_id.eq(user_id.as_str()))
            .order(saved_businesses::date_added.desc())
            .select((DbBusiness::as_select(), categories::name.nullable()))
            .load::<BusinessWithCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Business>, _>>()?;

        Ok(items)
    }
}

impl SavedBusinessWriter for DieselRepository {
    fn save_business(
        &self,
        user_id: &UserId,
        business_id: &BusinessId,
        now: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        use crate::schema::saved_businesses;

        let mut conn = self.conn()?;

        let row = DbSavedBusiness {
            user_id: user_id.to_string(),
            business_id: business_id.to_string(),
            date_added: now,
        };

        let affected = diesel::insert_or_ignore_into(saved_businesses::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn unsave_business(
        &self,
        user_id: &UserId,
        business_id: &BusinessId,
    ) -> RepositoryResult<usize> {
        use crate::schema::saved_businesses;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            saved_businesses::table.find((user_id.as_str(), business_id.as_str())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }
}
