use async_trait::async_trait;
use uuid::Uuid;

use crate::calendar::{Event, EventTemplate, RecurringEvent};

use super::{EventQuery, Result};

/// The event store the list builder reads from.
///
/// Implementations apply the keyword and taxonomy filters themselves and
/// hand back only what falls inside the query window.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Gets an event by its ID.
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>>;

    /// Templates of standard events overlapping the query window.
    async fn get_standard_events(&self, query: &EventQuery) -> Result<Vec<EventTemplate>>;

    /// Series that may produce occurrences inside the query window.
    async fn get_recurring_events(&self, query: &EventQuery) -> Result<Vec<RecurringEvent>>;

    /// Creates a new event.
    async fn create_event(&self, event: &Event) -> Result<()>;

    /// Number of stored events.
    async fn count_events(&self) -> Result<usize>;
}
