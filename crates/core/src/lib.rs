//! Recurrence engine and event-list builder for the eventide calendar.
//!
//! Everything here is pure: the `storage` traits describe the event store
//! the shell provides, and nothing in this crate performs I/O.

pub mod calendar;
pub mod serde;
pub mod storage;
