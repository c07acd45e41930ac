//! Event store implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `eventide_core::storage`.

pub mod inmemory;

pub use inmemory::InMemoryRepository;
