use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::analytics::{EntityType, EventType};
use crate::domain::types::{TypeConstraintError, UserId};
use crate::forms::non_blank;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrackEventForm {
    #[validate(length(min = 1))]
    pub entity_type: String,
    #[validate(length(min = 1))]
    pub entity_id: String,
    #[validate(length(min = 1))]
    pub event_type: String,
    pub user_id: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackEventPayload {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub event_type: EventType,
    pub user_id: Option<UserId>,
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Error)]
pub enum TrackEventFormError {
    #[error("Event validation failed: {0}")]
    Validation(String),
    #[error("Event contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for TrackEventFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for TrackEventFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<TrackEventForm> for TrackEventPayload {
    type Error = TrackEventFormError;

    fn try_from(value: TrackEventForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            entity_type: EntityType::try_from(value.entity_type.as_str())?,
            entity_id: value.entity_id.trim().to_string(),
            event_type: EventType::try_from(value.event_type.as_str())?,
            user_id: non_blank(value.user_id).map(UserId::new).transpose()?,
            metadata: value.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_event_names() {
        let form = TrackEventForm {
            entity_type: "business".into(),
            entity_id: "1".into(),
            event_type: "click".into(),
            user_id: None,
            metadata: BTreeMap::new(),
        };
        let payload: TrackEventPayload = form.try_into().unwrap();
        assert_eq!(payload.entity_type, EntityType::Business);
        assert_eq!(payload.event_type, EventType::Click);
    }

    #[test]
    fn rejects_unknown_event_names() {
        let form = TrackEventForm {
            entity_type: "business".into(),
            entity_id: "1".into(),
            event_type: "hover".into(),
            user_id: None,
            metadata: BTreeMap::new(),
        };
        let result: Result<TrackEventPayload, _> = form.try_into();
        assert!(matches!(result, Err(TrackEventFormError::TypeConstraint(_))));
    }
}
