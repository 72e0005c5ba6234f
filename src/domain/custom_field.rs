//! Niche-specific attributes attached to listings.
//!
//! Values the directory knows about are typed ([`CustomFieldValue`]) and can be
//! checked against a [`CustomFieldDefinition`]; anything else lands in
//! [`CustomFields::extra`] untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::types::{CustomFieldId, CustomFieldKey, TypeConstraintError};

/// Kind of value a custom field holds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CustomFieldKind {
    Text,
    Number,
    Boolean,
    Select,
    Multiselect,
}

impl CustomFieldKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
        }
    }
}

impl TryFrom<&str> for CustomFieldKind {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "select" => Ok(Self::Select),
            "multiselect" => Ok(Self::Multiselect),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "custom field kind: {other}"
            ))),
        }
    }
}

/// A typed custom field value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CustomFieldValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Select(String),
    Multiselect(Vec<String>),
}

impl CustomFieldValue {
    pub const fn kind(&self) -> CustomFieldKind {
        match self {
            Self::Text(_) => CustomFieldKind::Text,
            Self::Number(_) => CustomFieldKind::Number,
            Self::Boolean(_) => CustomFieldKind::Boolean,
            Self::Select(_) => CustomFieldKind::Select,
            Self::Multiselect(_) => CustomFieldKind::Multiselect,
        }
    }

    /// Interprets a loose JSON value according to `kind`.
    pub fn from_json(
        kind: CustomFieldKind,
        value: &serde_json::Value,
    ) -> Result<Self, TypeConstraintError> {
        use serde_json::Value;

        let mismatch = || {
            TypeConstraintError::InvalidValue(format!(
                "expected {} custom field value, got {value}",
                kind.as_str()
            ))
        };

        match (kind, value) {
            (CustomFieldKind::Text, Value::String(s)) => Ok(Self::Text(s.clone())),
            (CustomFieldKind::Select, Value::String(s)) => Ok(Self::Select(s.clone())),
            (CustomFieldKind::Number, Value::Number(n)) => {
                n.as_f64().map(Self::Number).ok_or_else(mismatch)
            }
            (CustomFieldKind::Number, Value::String(s)) => {
                s.trim().parse().map(Self::Number).map_err(|_| mismatch())
            }
            (CustomFieldKind::Boolean, Value::Bool(b)) => Ok(Self::Boolean(*b)),
            (CustomFieldKind::Multiselect, Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Self::Multiselect)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        }
    }
}

/// Numeric bounds and the message shown when a value violates them.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomFieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Entity a custom field definition applies to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CustomFieldEntity {
    Business,
    User,
    Category,
}

impl CustomFieldEntity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::User => "user",
            Self::Category => "category",
        }
    }
}

impl TryFrom<&str> for CustomFieldEntity {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "business" => Ok(Self::Business),
            "user" => Ok(Self::User),
            "category" => Ok(Self::Category),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "custom field entity: {other}"
            ))),
        }
    }
}

/// Schema of a known custom field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldDefinition {
    pub id: CustomFieldId,
    pub key: CustomFieldKey,
    pub name: String,
    pub kind: CustomFieldKind,
    pub required: bool,
    pub options: Vec<String>,
    pub validation: CustomFieldValidation,
    pub display_order: i32,
    pub is_searchable: bool,
    pub is_filterable: bool,
    pub entity_type: CustomFieldEntity,
}

impl CustomFieldDefinition {
    /// Checks that `value` has the right kind and respects options and bounds.
    pub fn check(&self, value: &CustomFieldValue) -> Result<(), TypeConstraintError> {
        let invalid = |reason: String| {
            let message = self.validation.message.clone().unwrap_or(reason);
            TypeConstraintError::InvalidValue(format!("{}: {message}", self.name))
        };

        if value.kind() != self.kind {
            return Err(invalid(format!("expected a {} value", self.kind.as_str())));
        }

        match value {
            CustomFieldValue::Select(choice) if !self.options.contains(choice) => {
                Err(invalid(format!("'{choice}' is not an allowed option")))
            }
            CustomFieldValue::Multiselect(choices) => {
                match choices.iter().find(|c| !self.options.contains(*c)) {
                    Some(bad) => Err(invalid(format!("'{bad}' is not an allowed option"))),
                    None => Ok(()),
                }
            }
            CustomFieldValue::Number(n) => {
                if self.validation.min.is_some_and(|min| *n < min)
                    || self.validation.max.is_some_and(|max| *n > max)
                {
                    Err(invalid(format!("{n} is out of range")))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}

/// Custom attributes carried by a business.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomFields {
    /// Values for keys with a known definition.
    #[serde(default)]
    pub typed: BTreeMap<String, CustomFieldValue>,
    /// Values for keys the directory has no definition for.
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CustomFields {
    pub fn is_empty(&self) -> bool {
        self.typed.is_empty() && self.extra.is_empty()
    }

    /// Sorts a loose JSON object into typed and extra values.
    ///
    /// Keys with a definition are converted and checked against it; all other
    /// keys are kept verbatim in `extra`.
    pub fn from_loose(
        raw: BTreeMap<String, serde_json::Value>,
        definitions: &[CustomFieldDefinition],
    ) -> Result<Self, TypeConstraintError> {
        let mut fields = Self::default();
        for (key, value) in raw {
            match definitions.iter().find(|d| d.key.as_str() == key) {
                Some(definition) => {
                    let typed = CustomFieldValue::from_json(definition.kind, &value)?;
                    definition.check(&typed)?;
                    fields.typed.insert(key, typed);
                }
                None => {
                    fields.extra.insert(key, value);
                }
            }
        }
        for definition in definitions.iter().filter(|d| d.required) {
            if !fields.typed.contains_key(definition.key.as_str()) {
                return Err(TypeConstraintError::InvalidValue(format!(
                    "{} is required",
                    definition.name
                )));
            }
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cuisine() -> CustomFieldDefinition {
        CustomFieldDefinition {
            id: CustomFieldId::new("cuisine-type").unwrap(),
            key: CustomFieldKey::new("cuisineType").unwrap(),
            name: "Cuisine Type".into(),
            kind: CustomFieldKind::Select,
            required: false,
            options: vec!["Italian".into(), "Chinese".into()],
            validation: CustomFieldValidation::default(),
            display_order: 1,
            is_searchable: true,
            is_filterable: true,
            entity_type: CustomFieldEntity::Business,
        }
    }

    fn meal_price() -> CustomFieldDefinition {
        CustomFieldDefinition {
            id: CustomFieldId::new("average-meal-price").unwrap(),
            key: CustomFieldKey::new("averageMealPrice").unwrap(),
            name: "Average Meal Price".into(),
            kind: CustomFieldKind::Number,
            required: false,
            options: vec![],
            validation: CustomFieldValidation {
                min: Some(5.0),
                max: Some(200.0),
                message: Some("Price must be between $5 and $200".into()),
            },
            display_order: 2,
            is_searchable: false,
            is_filterable: true,
            entity_type: CustomFieldEntity::Business,
        }
    }

    #[test]
    fn sorts_known_and_unknown_keys() {
        let raw = BTreeMap::from([
            ("cuisineType".to_string(), json!("Italian")),
            ("parking".to_string(), json!({"spaces": 4})),
        ]);
        let fields = CustomFields::from_loose(raw, &[cuisine()]).unwrap();
        assert_eq!(
            fields.typed.get("cuisineType"),
            Some(&CustomFieldValue::Select("Italian".into()))
        );
        assert_eq!(fields.extra.get("parking"), Some(&json!({"spaces": 4})));
    }

    #[test]
    fn rejects_unknown_select_option() {
        let raw = BTreeMap::from([("cuisineType".to_string(), json!("Martian"))]);
        assert!(CustomFields::from_loose(raw, &[cuisine()]).is_err());
    }

    #[test]
    fn number_bounds_use_definition_message() {
        let err = meal_price()
            .check(&CustomFieldValue::Number(500.0))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value: Average Meal Price: Price must be between $5 and $200"
        );
        assert!(meal_price().check(&CustomFieldValue::Number(25.0)).is_ok());
    }

    #[test]
    fn parses_numeric_strings() {
        let value = CustomFieldValue::from_json(CustomFieldKind::Number, &json!("42.5")).unwrap();
        assert_eq!(value, CustomFieldValue::Number(42.5));
    }

    #[test]
    fn typed_values_serialize_with_kind_tag() {
        let value = CustomFieldValue::Multiselect(vec!["Vegan".into()]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"kind": "multiselect", "value": ["Vegan"]})
        );
    }
}
