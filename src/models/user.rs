use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{BusinessId, Email, PersonName, TypeConstraintError, UserId, UserRole};
use crate::domain::user::{SavedBusiness as DomainSavedBusiness, User as DomainUser};

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub date_joined: NaiveDateTime,
}

/// Diesel model representing the `saved_businesses` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::saved_businesses)]
pub struct SavedBusiness {
    pub user_id: String,
    pub business_id: String,
    pub date_added: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(user.id)?,
            email: Email::new(user.email)?,
            name: PersonName::new(user.name)?,
            role: UserRole::try_from(user.role.as_str())?,
            is_active: user.is_active,
            date_joined: user.date_joined,
        })
    }
}

impl From<&DomainUser> for User {
    fn from(user: &DomainUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.to_string(),
            name: user.name.to_string(),
            role: user.role.as_str().to_string(),
            is_active: user.is_active,
            date_joined: user.date_joined,
        }
    }
}

impl TryFrom<SavedBusiness> for DomainSavedBusiness {
    type Error = TypeConstraintError;

    fn try_from(saved: SavedBusiness) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::new(saved.user_id)?,
            business_id: BusinessId::new(saved.business_id)?,
            date_added: saved.date_added,
        })
    }
}
