/// View state snapshots and the UI-facing projection
///
/// `HabitsState` is the container's raw state; `HabitsViewState` is the
/// derived read model handed to the UI. Consumers only ever see the latter.

use serde::Serialize;

use crate::domain::{DomainError, HabitCounter};

/// Raw state held by the container
///
/// The item list keeps per-item results because a single counter's stored
/// data can fail domain validation without affecting its neighbours.
#[derive(Debug, Clone, Default)]
pub struct HabitsState {
    pub counters: Vec<Result<HabitCounter, DomainError>>,
    pub is_add_dialog_visible: bool,
    pub new_habit_text: String,
}

/// One row of the habit list as the UI renders it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitItem {
    pub id: u32,
    pub name: String,
    pub count: u32,
}

/// Derived, read-only view of the current state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HabitsViewState {
    pub items: Vec<HabitItem>,
}

impl From<&HabitsState> for HabitsViewState {
    /// Project the raw state into the UI read model
    ///
    /// Error entries and counters without an id (not yet persisted) are
    /// dropped; relative order of the surviving entries is preserved.
    fn from(state: &HabitsState) -> Self {
        let items = state
            .counters
            .iter()
            .filter_map(|entry| entry.as_ref().ok())
            .filter_map(|counter| {
                counter.id().map(|id| HabitItem {
                    id,
                    name: counter.name().to_string(),
                    count: counter.number_of_days(),
                })
            })
            .collect();
        Self { items }
    }
}
