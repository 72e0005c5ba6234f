use diesel::dsl::count_star;
use diesel::prelude::*;

use crate::domain::analytics::{AnalyticsEvent, AnalyticsSummary, EntityType, EventType};
use crate::models::analytics::NewAnalyticsEvent;
use crate::repository::errors::RepositoryResult;
use crate::repository::{AnalyticsReader, AnalyticsWriter, DieselRepository};

impl AnalyticsReader for DieselRepository {
    fn analytics_summary(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> RepositoryResult<AnalyticsSummary> {
        use crate::schema::analytics;

        let mut conn = self.conn()?;

        let counts = analytics::table
            .filter(analytics::entity_type.eq(entity_type.as_str()))
            .filter(analytics::entity_id.eq(entity_id))
            .group_by(analytics::event_type)
            .select((analytics::event_type, count_star()))
            .load::<(String, i64)>(&mut conn)?;

        let mut summary = AnalyticsSummary::default();
        for (event_type, count) in counts {
            // Unknown event names from older rows are not summarized.
            if let Ok(event_type) = EventType::try_from(event_type.as_str()) {
                summary.add(event_type, count);
            }
        }

        Ok(summary)
    }
}

impl AnalyticsWriter for DieselRepository {
    fn record_event(&self, event: &AnalyticsEvent) -> RepositoryResult<usize> {
        use crate::schema::analytics;

        let mut conn = self.conn()?;
        let row = NewAnalyticsEvent::try_from(event)?;

        let affected = diesel::insert_into(analytics::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(affected)
    }
}
