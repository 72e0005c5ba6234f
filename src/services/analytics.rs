use chrono::Utc;

use crate::domain::analytics::{AnalyticsEvent, AnalyticsSummary, EntityType};
use crate::forms::analytics::TrackEventPayload;
use crate::repository::{AnalyticsReader, AnalyticsWriter};

use super::{ServiceError, ServiceResult, repository_failure};

/// Records `event`, logging instead of failing when the store rejects it.
pub fn track_event<R>(event: &AnalyticsEvent, repo: &R)
where
    R: AnalyticsWriter,
{
    if let Err(e) = repo.record_event(event) {
        log::warn!(
            "Failed to record {} event for {} {}: {e}",
            event.event_type.as_str(),
            event.entity_type.as_str(),
            event.entity_id
        );
    }
}

/// Records an event reported by a client.
pub fn record_event<R>(payload: TrackEventPayload, repo: &R) -> ServiceResult<()>
where
    R: AnalyticsWriter,
{
    let mut event = AnalyticsEvent::new(
        payload.entity_type,
        payload.entity_id,
        payload.event_type,
        Utc::now().naive_utc(),
    );
    event.user_id = payload.user_id;
    event.metadata = payload.metadata;

    track_event(&event, repo);
    Ok(())
}

pub fn analytics_summary<R>(
    entity_type: &str,
    entity_id: &str,
    repo: &R,
) -> ServiceResult<AnalyticsSummary>
where
    R: AnalyticsReader,
{
    let entity_type =
        EntityType::try_from(entity_type).map_err(|e| ServiceError::Form(e.to_string()))?;

    repo.analytics_summary(entity_type, entity_id)
        .map_err(|e| repository_failure("load analytics summary", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::EventType;
    use crate::repository::test::TestRepository;

    fn event(event_type: EventType) -> AnalyticsEvent {
        AnalyticsEvent::new(
            EntityType::Business,
            "1",
            event_type,
            Utc::now().naive_utc(),
        )
    }

    #[test]
    fn summary_counts_tracked_events() {
        let repo = TestRepository::new();
        track_event(&event(EventType::View), &repo);
        track_event(&event(EventType::View), &repo);
        track_event(&event(EventType::Share), &repo);
        track_event(&event(EventType::Update), &repo);

        let summary = analytics_summary("business", "1", &repo).unwrap();
        assert_eq!(summary.views, 2);
        assert_eq!(summary.shares, 1);
        assert_eq!(summary.clicks, 0);
    }

    #[test]
    fn tracking_failures_are_swallowed() {
        let repo = TestRepository::failing();
        track_event(&event(EventType::View), &repo);
        assert!(repo.events().is_empty());
    }

    #[test]
    fn unknown_entity_type_is_a_form_error() {
        let repo = TestRepository::new();
        let result = analytics_summary("planet", "1", &repo);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
