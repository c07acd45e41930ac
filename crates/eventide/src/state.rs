use std::path::Path;
use std::sync::Arc;

use chrono::Local;

use eventide_core::calendar::generate_seed_events;
use eventide_core::storage::EventRepository;

use crate::config::Config;
use crate::storage::InMemoryRepository;

/// Shared application state.
///
/// Cloned for each request handler. Holds the event store behind its
/// repository trait and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    /// Event store.
    pub event_repo: Arc<dyn EventRepository>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(event_repo: Arc<dyn EventRepository>, config: Config) -> Self {
        Self {
            event_repo,
            config: Arc::new(config),
        }
    }

    /// State backed by an in-memory store filled with demo events around today.
    pub fn with_demo_data(config: Config) -> Self {
        let today = Local::now().date_naive();
        let repo = InMemoryRepository::with_events(generate_seed_events(today));
        Self::new(Arc::new(repo), config)
    }

    /// State backed by an in-memory store loaded from a JSON seed file.
    pub async fn from_seed_file(path: &Path, config: Config) -> anyhow::Result<Self> {
        let repo = InMemoryRepository::from_seed_file(path).await?;
        Ok(Self::new(Arc::new(repo), config))
    }
}

impl Default for AppState {
    /// Empty store with configuration from the environment.
    fn default() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()), Config::default())
    }
}
