use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{BusinessId, Email, PersonName, UserId, UserRole};

/// Directory user: reviewer, business owner or staff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: PersonName,
    pub role: UserRole,
    pub is_active: bool,
    pub date_joined: NaiveDateTime,
}

/// A business bookmarked by a user. Each pair exists at most once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedBusiness {
    pub user_id: UserId,
    pub business_id: BusinessId,
    pub date_added: NaiveDateTime,
}
