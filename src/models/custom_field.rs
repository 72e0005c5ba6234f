use diesel::prelude::*;

use crate::domain::custom_field::{
    CustomFieldDefinition as DomainCustomFieldDefinition, CustomFieldEntity, CustomFieldKind,
};
use crate::domain::types::{CustomFieldId, CustomFieldKey, TypeConstraintError};
use crate::models::{from_json, to_json};

/// Diesel model representing the `custom_field_definitions` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::custom_field_definitions)]
pub struct CustomFieldDefinition {
    pub id: String,
    pub key: String,
    pub name: String,
    pub kind: String,
    pub required: bool,
    pub options: String,
    pub validation: String,
    pub display_order: i32,
    pub is_searchable: bool,
    pub is_filterable: bool,
    pub entity_type: String,
}

impl TryFrom<CustomFieldDefinition> for DomainCustomFieldDefinition {
    type Error = TypeConstraintError;

    fn try_from(definition: CustomFieldDefinition) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CustomFieldId::new(definition.id)?,
            key: CustomFieldKey::new(definition.key)?,
            name: definition.name,
            kind: CustomFieldKind::try_from(definition.kind.as_str())?,
            required: definition.required,
            options: from_json("options", &definition.options)?,
            validation: from_json("validation", &definition.validation)?,
            display_order: definition.display_order,
            is_searchable: definition.is_searchable,
            is_filterable: definition.is_filterable,
            entity_type: CustomFieldEntity::try_from(definition.entity_type.as_str())?,
        })
    }
}

impl TryFrom<&DomainCustomFieldDefinition> for CustomFieldDefinition {
    type Error = serde_json::Error;

    fn try_from(definition: &DomainCustomFieldDefinition) -> Result<Self, Self::Error> {
        Ok(Self {
            id: definition.id.to_string(),
            key: definition.key.to_string(),
            name: definition.name.clone(),
            kind: definition.kind.as_str().to_string(),
            required: definition.required,
            options: to_json(&definition.options)?,
            validation: to_json(&definition.validation)?,
            display_order: definition.display_order,
            is_searchable: definition.is_searchable,
            is_filterable: definition.is_filterable,
            entity_type: definition.entity_type.as_str().to_string(),
        })
    }
}
