use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, UserId};

/// Kind of entity an analytics event refers to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Business,
    Blog,
    Category,
    User,
}

impl EntityType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Blog => "blog",
            Self::Category => "category",
            Self::User => "user",
        }
    }
}

impl TryFrom<&str> for EntityType {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "business" => Ok(Self::Business),
            "blog" => Ok(Self::Blog),
            "category" => Ok(Self::Category),
            "user" => Ok(Self::User),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "entity type: {other}"
            ))),
        }
    }
}

/// What happened to the entity.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    View,
    Click,
    Share,
    Save,
    Search,
    Contact,
    Create,
    Update,
    Delete,
}

impl EventType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Click => "click",
            Self::Share => "share",
            Self::Save => "save",
            Self::Search => "search",
            Self::Contact => "contact",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl TryFrom<&str> for EventType {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "view" => Ok(Self::View),
            "click" => Ok(Self::Click),
            "share" => Ok(Self::Share),
            "save" => Ok(Self::Save),
            "search" => Ok(Self::Search),
            "contact" => Ok(Self::Contact),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "event type: {other}"
            ))),
        }
    }
}

/// Append-only usage record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub event_type: EventType,
    pub user_id: Option<UserId>,
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub timestamp: NaiveDateTime,
}

impl AnalyticsEvent {
    pub fn new(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        event_type: EventType,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            entity_type,
            entity_id: entity_id.into(),
            event_type,
            user_id: None,
            metadata: BTreeMap::new(),
            timestamp,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// Per-entity event totals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub views: i64,
    pub clicks: i64,
    pub shares: i64,
    pub saves: i64,
}

impl AnalyticsSummary {
    /// Adds `count` events of `event_type`; types outside the summary are ignored.
    pub fn add(&mut self, event_type: EventType, count: i64) {
        match event_type {
            EventType::View => self.views += count,
            EventType::Click => self.clicks += count,
            EventType::Share => self.shares += count,
            EventType::Save => self.saves += count,
            _ => {}
        }
    }
}
