/// Public library interface for the habit counter core
///
/// Habit counters are persistent streaks that increase at most once per local
/// calendar day. This crate provides the validated domain model, the reactive
/// state/effect container that exposes it to a UI, and the storage
/// collaborator contract the container talks to.

// Internal modules
mod domain;
mod state;
mod store;

// Re-export public modules and types
pub use domain::*;
pub use state::*;
pub use store::{CounterSnapshot, HabitStore, MemoryStore, MemoryStoreError};
