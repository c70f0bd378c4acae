/// Storage collaborator contract for habit counters
///
/// The core only ever talks to this trait; what sits behind it (a database,
/// a sync service) is not this crate's concern. `MemoryStore` is the
/// reference implementation used by the demo binary and the tests.

pub mod memory;

pub use memory::*;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::{DomainError, HabitCounter};

/// Snapshot emitted by the store: one result per stored counter
///
/// Per-item results let a single corrupt record fail validation without
/// taking the rest of the collection down with it.
pub type CounterSnapshot = Vec<Result<HabitCounter, DomainError>>;

/// Interface the state container uses to observe and mutate counters
#[async_trait]
pub trait HabitStore: Send + Sync {
    /// Observe the full collection; a fresh subscription yields the current
    /// snapshot first, then every subsequent change
    fn observe_all(&self) -> BoxStream<'static, CounterSnapshot>;

    /// Apply the once-per-day increase to the counter with the given id
    ///
    /// Concurrent increases of the same id are serialized by the store so
    /// the daily invariant holds.
    async fn increase(&self, id: u32) -> Result<(), DomainError>;

    /// Seed the store with its default counters, once
    ///
    /// Fails with `StoreAlreadyPopulated` if any counter already exists.
    async fn populate_if_empty(&self) -> Result<(), DomainError>;
}
