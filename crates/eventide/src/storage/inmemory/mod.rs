//! In-memory event store.
//!
//! Stores events in a HashMap wrapped in `Arc<RwLock<_>>` and filters them
//! with the predicates from `eventide_core::calendar`. Seeded from demo data
//! or a JSON file at startup.
//!
//! # Example
//!
//! ```rust,ignore
//! use eventide::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::with_events(generate_seed_events(today));
//! ```

mod repository;

pub use repository::InMemoryRepository;
