use diesel::prelude::*;

use crate::domain::custom_field::{CustomFieldDefinition, CustomFieldEntity};
use crate::models::custom_field::CustomFieldDefinition as DbCustomFieldDefinition;
use crate::repository::errors::RepositoryResult;
use crate::repository::{CustomFieldReader, CustomFieldWriter, DieselRepository};

impl CustomFieldReader for DieselRepository {
    fn list_custom_fields(
        &self,
        entity_type: CustomFieldEntity,
    ) -> RepositoryResult<Vec<CustomFieldDefinition>> {
        use crate::schema::custom_field_definitions;

        let mut conn = self.conn()?;

        let items = custom_field_definitions::table
            .filter(custom_field_definitions::entity_type.eq(entity_type.as_str()))
            .order((
                custom_field_definitions::display_order.asc(),
                custom_field_definitions::key.asc(),
            ))
            .load::<DbCustomFieldDefinition>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<CustomFieldDefinition>, _>>()?;

        Ok(items)
    }
}

impl CustomFieldWriter for DieselRepository {
    fn create_custom_field(&self, definition: &CustomFieldDefinition) -> RepositoryResult<usize> {
        use crate::schema::custom_field_definitions;

        let mut conn = self.conn()?;
        let row = DbCustomFieldDefinition::try_from(definition)?;

        let affected = diesel::insert_into(custom_field_definitions::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(affected)
    }
}
