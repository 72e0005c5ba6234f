use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::analytics::{AnalyticsEvent as DomainAnalyticsEvent, EntityType, EventType};
use crate::domain::types::{TypeConstraintError, UserId};
use crate::models::{from_json, to_json};

/// Diesel model representing the `analytics` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::analytics)]
pub struct AnalyticsEvent {
    pub id: i32,
    pub entity_type: String,
    pub entity_id: String,
    pub event_type: String,
    pub user_id: Option<String>,
    pub metadata: String,
    pub timestamp: NaiveDateTime,
}

/// Insertable form of [`AnalyticsEvent`]; the id is assigned by SQLite.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::analytics)]
pub struct NewAnalyticsEvent {
    pub entity_type: String,
    pub entity_id: String,
    pub event_type: String,
    pub user_id: Option<String>,
    pub metadata: String,
    pub timestamp: NaiveDateTime,
}

impl TryFrom<AnalyticsEvent> for DomainAnalyticsEvent {
    type Error = TypeConstraintError;

    fn try_from(event: AnalyticsEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            entity_type: EntityType::try_from(event.entity_type.as_str())?,
            entity_id: event.entity_id,
            event_type: EventType::try_from(event.event_type.as_str())?,
            user_id: event.user_id.map(UserId::new).transpose()?,
            metadata: from_json("metadata", &event.metadata)?,
            timestamp: event.timestamp,
        })
    }
}

impl TryFrom<&DomainAnalyticsEvent> for NewAnalyticsEvent {
    type Error = serde_json::Error;

    fn try_from(event: &DomainAnalyticsEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            entity_type: event.entity_type.as_str().to_string(),
            entity_id: event.entity_id.clone(),
            event_type: event.event_type.as_str().to_string(),
            user_id: event.user_id.as_ref().map(ToString::to_string),
            metadata: to_json(&event.metadata)?,
            timestamp: event.timestamp,
        })
    }
}
