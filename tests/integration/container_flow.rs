/// Integration tests for the reactive container against storage collaborators
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::{timeout, Duration};

use habit_counter::*;

/// Wait until the projection satisfies a predicate, with a safety timeout
async fn wait_for_view(
    view: &mut watch::Receiver<HabitsViewState>,
    predicate: impl Fn(&HabitsViewState) -> bool,
) -> HabitsViewState {
    timeout(Duration::from_secs(5), async {
        loop {
            {
                let snapshot = view.borrow_and_update();
                if predicate(&snapshot) {
                    return snapshot.clone();
                }
            }
            view.changed().await.expect("view channel closed");
        }
    })
    .await
    .expect("view did not reach the expected state in time")
}

/// Wait until at least one effect is pending
async fn wait_for_effect(effects: &mut watch::Receiver<usize>) {
    timeout(Duration::from_secs(5), async {
        while *effects.borrow_and_update() == 0 {
            effects.changed().await.expect("effect channel closed");
        }
    })
    .await
    .expect("no effect arrived in time");
}

/// Store that replays a fixed script of snapshots, then stays silent
struct ScriptedStore {
    batches: Vec<CounterSnapshot>,
}

#[async_trait]
impl HabitStore for ScriptedStore {
    fn observe_all(&self) -> BoxStream<'static, CounterSnapshot> {
        futures::stream::iter(self.batches.clone())
            .chain(futures::stream::pending())
            .boxed()
    }

    async fn increase(&self, _id: u32) -> Result<(), DomainError> {
        Ok(())
    }

    async fn populate_if_empty(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Store whose collection stream closes after a single snapshot
struct ClosingStore {
    batch: CounterSnapshot,
}

#[async_trait]
impl HabitStore for ClosingStore {
    fn observe_all(&self) -> BoxStream<'static, CounterSnapshot> {
        futures::stream::iter(vec![self.batch.clone()]).boxed()
    }

    async fn increase(&self, _id: u32) -> Result<(), DomainError> {
        Ok(())
    }

    async fn populate_if_empty(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod container_flow_tests {
    use super::*;

    #[tokio::test]
    async fn seeded_counters_reach_the_projection() {
        let store = Arc::new(MemoryStore::with_seed(&["reading", "workout"]));
        let container = HabitsContainer::new(store, Handle::current());

        let mut view = container.view_state();
        let snapshot = wait_for_view(&mut view, |v| v.items.len() == 2).await;

        assert_eq!(snapshot.items[0].id, 1);
        assert_eq!(snapshot.items[0].name, "reading");
        assert_eq!(snapshot.items[0].count, 0);
        assert_eq!(snapshot.items[1].name, "workout");
    }

    #[tokio::test]
    async fn activating_an_item_flows_back_through_the_collection_stream() {
        let store = Arc::new(MemoryStore::with_seed(&["reading"]));
        let container = HabitsContainer::new(store, Handle::current());

        let mut view = container.view_state();
        wait_for_view(&mut view, |v| v.items.len() == 1).await;

        container.on_item_activated(1).await;
        let snapshot = wait_for_view(&mut view, |v| {
            v.items.first().map(|item| item.count) == Some(1)
        })
        .await;
        assert_eq!(snapshot.items[0].count, 1);

        // A second activation the same day is rejected by the domain rule
        // and the projection stays as it was.
        container.on_item_activated(1).await;
        tokio::task::yield_now().await;
        assert_eq!(view.borrow().items[0].count, 1);
    }

    #[tokio::test]
    async fn error_entries_are_dropped_from_the_projection() {
        let counter =
            HabitCounter::persisted(1, 3, "reading", Local::now().timestamp_millis()).unwrap();
        let store = Arc::new(ScriptedStore {
            batches: vec![vec![Ok(counter), Err(DomainError::EmptyName)]],
        });
        let container = HabitsContainer::new(store, Handle::current());

        let mut view = container.view_state();
        let snapshot = wait_for_view(&mut view, |v| !v.items.is_empty()).await;

        // Exactly the valid entry survives; the bad one is logged and dropped
        // without terminating the subscription.
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].name, "reading");

        // The container is still fully usable afterwards.
        container.on_draft_text_changed("meditate");
        assert_eq!(container.new_habit_text(), "meditate");
    }

    #[tokio::test]
    async fn closed_collection_stream_keeps_the_last_snapshot_served() {
        let counter =
            HabitCounter::persisted(1, 6, "workout", Local::now().timestamp_millis()).unwrap();
        let store = Arc::new(ClosingStore {
            batch: vec![Ok(counter)],
        });
        let container = HabitsContainer::new(store, Handle::current());

        let mut view = container.view_state();
        wait_for_view(&mut view, |v| !v.items.is_empty()).await;

        // Let the subscription task observe the end of the stream.
        tokio::task::yield_now().await;

        // The last snapshot stays available, to current and late subscribers.
        assert_eq!(view.borrow().items[0].count, 6);
        let late = container.view_state();
        assert_eq!(late.borrow().items.len(), 1);

        // Commands still work after the stream has ended.
        container.on_add_requested();
        assert!(container.is_add_dialog_visible());
        container.on_draft_text_changed("meditate");
        assert_eq!(container.new_habit_text(), "meditate");
        container.on_item_activated(1).await;
    }

    #[tokio::test]
    async fn container_survives_a_failed_initial_populate() {
        let store = Arc::new(MemoryStore::with_seed(&["reading"]));
        // Seed up front so the container's own populate hits
        // StoreAlreadyPopulated, which must be logged and swallowed.
        store.populate_if_empty().await.unwrap();

        let container = HabitsContainer::new(store, Handle::current());
        let mut view = container.view_state();
        wait_for_view(&mut view, |v| v.items.len() == 1).await;

        container.on_item_activated(1).await;
        wait_for_view(&mut view, |v| {
            v.items.first().map(|item| item.count) == Some(1)
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn dialog_opens_immediately_and_focus_follows_after_the_delay() {
        let store = Arc::new(MemoryStore::new());
        let container = HabitsContainer::new(store, Handle::current());
        let mut effects = container.effect_signal();

        container.on_add_requested();

        // Visibility flips right away; the effect is still in flight.
        assert!(container.is_add_dialog_visible());
        assert!(container.consume_next_effect().is_none());

        wait_for_effect(&mut effects).await;
        assert_eq!(
            container.consume_next_effect(),
            Some(Effect::RequestFocusOnNewHabitInput)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn effects_drain_in_fifo_order() {
        let store = Arc::new(MemoryStore::new());
        let container = HabitsContainer::new(store, Handle::current());
        let mut effects = container.effect_signal();

        container.on_add_requested();
        wait_for_effect(&mut effects).await;
        container.on_new_habit_confirmed();

        assert_eq!(
            container.consume_next_effect(),
            Some(Effect::RequestFocusOnNewHabitInput)
        );
        assert_eq!(container.consume_next_effect(), Some(Effect::HideKeyboard));
        assert_eq!(container.consume_next_effect(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn confirming_a_new_habit_resets_the_dialog_state() {
        let store = Arc::new(MemoryStore::new());
        let container = HabitsContainer::new(store, Handle::current());

        container.on_add_requested();
        container.on_draft_text_changed("meditate");
        assert_eq!(container.new_habit_text(), "meditate");

        container.on_new_habit_confirmed();
        assert!(!container.is_add_dialog_visible());
        assert_eq!(container.new_habit_text(), "");
        assert_eq!(container.consume_next_effect(), Some(Effect::HideKeyboard));
    }

    #[tokio::test(start_paused = true)]
    async fn disposal_cancels_the_pending_focus_effect() {
        let store = Arc::new(MemoryStore::new());
        let container = HabitsContainer::new(store, Handle::current());

        container.on_add_requested();
        container.dispose();

        // Well past the focus delay; the aborted timer must not enqueue.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(container.consume_next_effect().is_none());

        // Disposing again is a no-op, never a fault.
        container.dispose();
    }

    #[tokio::test]
    async fn late_subscribers_see_the_cached_projection() {
        let store = Arc::new(MemoryStore::with_seed(&["reading"]));
        let container = HabitsContainer::new(store, Handle::current());

        let mut first = container.view_state();
        wait_for_view(&mut first, |v| v.items.len() == 1).await;
        drop(first);

        // A brand-new subscription gets the latest snapshot without any
        // producer restart.
        let second = container.view_state();
        assert_eq!(second.borrow().items.len(), 1);
    }
}
