//! In-memory event store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use eventide_core::calendar::{
    filter_recurring_events, filter_standard_events, validate_event_template, validate_rule,
    Event, EventTemplate, RecurringEvent,
};
use eventide_core::storage::{EventQuery, EventRepository, RepositoryError, Result};

/// In-memory event store.
///
/// Uses a HashMap wrapped in `Arc<RwLock<_>>` for thread-safe access and
/// applies the keyword, taxonomy and window filters on read. Data is not
/// persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `events`, without validating them.
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let events = events.into_iter().map(|event| (event.id, event)).collect();
        Self {
            events: Arc::new(RwLock::new(events)),
        }
    }

    /// Loads a JSON array of events from `path` through `create_event`.
    ///
    /// Events that fail validation are logged and skipped.
    pub async fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let events: Vec<Event> = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse seed file {}", path.display()))?;

        let repo = Self::new();
        for event in &events {
            if let Err(error) = repo.create_event(event).await {
                tracing::warn!(event_id = %event.id, %error, "skipping seed event");
            }
        }

        tracing::info!(
            path = %path.display(),
            events = repo.count_events().await?,
            "loaded seed events"
        );
        Ok(repo)
    }
}

#[async_trait]
impl EventRepository for InMemoryRepository {
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(&id).cloned())
    }

    async fn get_standard_events(&self, query: &EventQuery) -> Result<Vec<EventTemplate>> {
        let events = self.events.read().await;
        Ok(filter_standard_events(events.values(), query))
    }

    async fn get_recurring_events(&self, query: &EventQuery) -> Result<Vec<RecurringEvent>> {
        let events = self.events.read().await;
        Ok(filter_recurring_events(events.values(), query))
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        validate_event_template(&event.template)
            .map_err(|error| RepositoryError::InvalidData(error.to_string()))?;
        if let Some(Err(error)) = event.rule().map(|rule| validate_rule(&rule)) {
            tracing::warn!(event_id = %event.id, %error, "series will never occur");
        }

        let mut events = self.events.write().await;
        if events.contains_key(&event.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Event",
                id: event.id.to_string(),
            });
        }
        events.insert(event.id, event.clone());
        Ok(())
    }

    async fn count_events(&self) -> Result<usize> {
        let events = self.events.read().await;
        Ok(events.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use eventide_core::calendar::Recurrence;
    use eventide_core::storage::DateRange;

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn november() -> EventQuery {
        EventQuery::new(DateRange::month(2018, 11).unwrap())
    }

    fn sample_events() -> Vec<Event> {
        vec![
            Event::new("Harvest Fair", make_date(2018, 11, 3))
                .with_description("Local produce")
                .with_region(1)
                .with_event_type(11),
            Event::new("Winter Fair", make_date(2018, 12, 8)).with_region(1),
            Event::recurring(
                "Jazz Evening",
                make_date(2018, 11, 2),
                Recurrence::Weekly {
                    interval: 2,
                    weekdays: [Weekday::Fri].into(),
                },
            )
            .with_region(2)
            .with_event_type(10),
        ]
    }

    #[tokio::test]
    async fn test_create_and_get_event() {
        let repo = InMemoryRepository::new();
        let event = Event::new("Quiz Night", make_date(2018, 11, 14));

        repo.create_event(&event).await.unwrap();

        let fetched = repo.get_event(event.id).await.unwrap();
        assert_eq!(fetched, Some(event));
        assert_eq!(repo.count_events().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent_event() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_event(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_event() {
        let repo = InMemoryRepository::new();
        let event = Event::new("Quiz Night", make_date(2018, 11, 14));
        repo.create_event(&event).await.unwrap();

        let result = repo.create_event(&event).await;

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "Event",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_create_invalid_event() {
        let repo = InMemoryRepository::new();
        let event = Event::new("", make_date(2018, 11, 14));

        let result = repo.create_event(&event).await;

        assert_eq!(
            result,
            Err(RepositoryError::InvalidData(
                "Event title cannot be empty".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_degenerate_series_is_stored() {
        let repo = InMemoryRepository::new();
        let event = Event::recurring(
            "Never",
            make_date(2018, 11, 1),
            Recurrence::Daily { interval: 0 },
        );

        repo.create_event(&event).await.unwrap();
        assert_eq!(repo.count_events().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_standard_events_in_window() {
        let repo = InMemoryRepository::with_events(sample_events());

        let standard = repo.get_standard_events(&november()).await.unwrap();

        assert_eq!(standard.len(), 1);
        assert_eq!(standard[0].title, "Harvest Fair");
    }

    #[tokio::test]
    async fn test_recurring_events_filtered_by_taxonomy() {
        let repo = InMemoryRepository::with_events(sample_events());

        let all = repo.get_recurring_events(&november()).await.unwrap();
        assert_eq!(all.len(), 1);

        let region_one = repo
            .get_recurring_events(&november().with_regions([1]))
            .await
            .unwrap();
        assert!(region_one.is_empty());

        let music = repo
            .get_recurring_events(&november().with_event_types([10]))
            .await
            .unwrap();
        assert_eq!(music.len(), 1);
    }

    #[tokio::test]
    async fn test_keyword_filter() {
        let repo = InMemoryRepository::with_events(sample_events());

        let standard = repo
            .get_standard_events(&november().with_keyword("PRODUCE"))
            .await
            .unwrap();
        assert_eq!(standard.len(), 1);

        let recurring = repo
            .get_recurring_events(&november().with_keyword("produce"))
            .await
            .unwrap();
        assert!(recurring.is_empty());
    }

    #[tokio::test]
    async fn test_from_seed_file() {
        let path = std::env::temp_dir().join(format!("eventide-seed-{}.json", Uuid::new_v4()));
        let mut events = sample_events();
        events.push(Event::new("  ", make_date(2018, 11, 20)));
        tokio::fs::write(&path, serde_json::to_string(&events).unwrap())
            .await
            .unwrap();

        let repo = InMemoryRepository::from_seed_file(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(repo.count_events().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_from_missing_seed_file() {
        let path = std::env::temp_dir().join(format!("eventide-missing-{}.json", Uuid::new_v4()));
        assert!(InMemoryRepository::from_seed_file(&path).await.is_err());
    }
}
