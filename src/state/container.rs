/// Reactive container bridging the UI collaborator and the habit store
///
/// The container owns the raw `HabitsState`, applies every mutation through a
/// single guarded writer path, and publishes the derived `HabitsViewState`
/// over a watch channel. Background work (initial populate, the collection
/// subscription, the delayed focus effect) runs on an explicitly injected
/// runtime handle and is torn down deterministically on disposal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::DomainError;
use crate::state::{Effect, EffectQueue, HabitsState, HabitsViewState, Keyboard};
use crate::store::HabitStore;

/// Pause between opening the add dialog and requesting input focus
///
/// Gives the dialog animation time to settle before the keyboard pops up.
pub const FOCUS_EFFECT_DELAY: Duration = Duration::from_millis(150);

/// State shared with the container's background tasks
struct Shared {
    store: Arc<dyn HabitStore>,
    state_tx: watch::Sender<HabitsState>,
    view_tx: watch::Sender<HabitsViewState>,
    effects: EffectQueue,
    disposed: AtomicBool,
    write_guard: Mutex<()>,
}

impl Shared {
    /// Apply a state mutation and republish the derived view
    ///
    /// The guard serializes writers so the view snapshots go out in the same
    /// order the mutations were applied.
    fn apply(&self, mutate: impl FnOnce(&mut HabitsState)) {
        let _guard = self
            .write_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.state_tx.send_modify(mutate);
        let view = HabitsViewState::from(&*self.state_tx.borrow());
        self.view_tx.send_replace(view);
    }

    /// Enqueue an effect unless the container was already disposed
    fn send_effect(&self, effect: Effect) {
        if !self.disposed.load(Ordering::Acquire) {
            self.effects.enqueue(effect);
        }
    }
}

/// Observable state/effect container for the habit list screen
pub struct HabitsContainer {
    shared: Arc<Shared>,
    handle: Handle,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl HabitsContainer {
    /// Create the container and start its background subscriptions
    ///
    /// The runtime handle is mandatory; the container never falls back to an
    /// ambient global scheduler. On construction it seeds the store once
    /// (failures are logged, never fatal) and subscribes to the store's
    /// collection stream for the container's whole lifetime.
    pub fn new(store: Arc<dyn HabitStore>, handle: Handle) -> Self {
        let state = HabitsState::default();
        let (view_tx, _) = watch::channel(HabitsViewState::from(&state));
        let (state_tx, _) = watch::channel(state);

        let shared = Arc::new(Shared {
            store,
            state_tx,
            view_tx,
            effects: EffectQueue::new(),
            disposed: AtomicBool::new(false),
            write_guard: Mutex::new(()),
        });

        let container = Self {
            shared,
            handle,
            tasks: Mutex::new(Vec::new()),
        };
        container.spawn_populate();
        container.spawn_collection_subscription();
        container
    }

    /// UI tapped a habit row: run the increase through the store
    ///
    /// On success the updated counter arrives back through the collection
    /// stream, so nothing is mutated here. Failures are logged; rendering a
    /// notification for them is the UI collaborator's job.
    pub async fn on_item_activated(&self, id: u32) {
        match self.shared.store.increase(id).await {
            Ok(()) => info!(id, "habit counter increased"),
            Err(DomainError::AlreadyIncreasedToday) => {
                info!(id, "habit counter was already increased today");
            }
            Err(error) => warn!(id, %error, "increasing habit counter failed"),
        }
    }

    /// UI asked to add a new habit: show the dialog, then request focus
    ///
    /// The visibility flip happens immediately; the focus effect follows
    /// after `FOCUS_EFFECT_DELAY` on a spawned timer that dies with the
    /// container.
    pub fn on_add_requested(&self) {
        self.shared.apply(|state| state.is_add_dialog_visible = true);

        let shared = Arc::clone(&self.shared);
        let timer = self.handle.spawn(async move {
            tokio::time::sleep(FOCUS_EFFECT_DELAY).await;
            shared.send_effect(Effect::RequestFocusOnNewHabitInput);
        });
        self.track(timer);
    }

    /// UI confirmed the new-habit dialog
    pub fn on_new_habit_confirmed(&self) {
        self.shared.apply(|state| {
            state.new_habit_text.clear();
            state.is_add_dialog_visible = false;
        });
        self.shared.send_effect(Effect::HideKeyboard);
    }

    /// UI changed the draft text; stored verbatim, validated downstream
    pub fn on_draft_text_changed(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared.apply(move |state| state.new_habit_text = text);
    }

    /// Subscribe to the derived, read-only view projection
    ///
    /// Late subscribers immediately see the latest snapshot; subscribing and
    /// unsubscribing never restarts any producer work.
    pub fn view_state(&self) -> watch::Receiver<HabitsViewState> {
        self.shared.view_tx.subscribe()
    }

    /// Observe the pending-effect count; above zero means there is work
    pub fn effect_signal(&self) -> watch::Receiver<usize> {
        self.shared.effects.subscribe()
    }

    /// Take the oldest pending effect, if any
    pub fn consume_next_effect(&self) -> Option<Effect> {
        self.shared.effects.consume_next()
    }

    /// Dispatch a consumed effect to the keyboard collaborator
    pub fn on_effect(&self, effect: Effect, keyboard: &dyn Keyboard) {
        match effect {
            Effect::RequestFocusOnNewHabitInput => keyboard.show(),
            Effect::HideKeyboard => keyboard.hide(),
        }
    }

    /// Whether the add-habit dialog is currently visible
    pub fn is_add_dialog_visible(&self) -> bool {
        self.shared.state_tx.borrow().is_add_dialog_visible
    }

    /// Current draft text for the new habit's name
    pub fn new_habit_text(&self) -> String {
        self.shared.state_tx.borrow().new_habit_text.clone()
    }

    /// Tear down background tasks; safe to call more than once
    ///
    /// After disposal the delayed focus timer may still fire its abort
    /// window; the effect enqueue is a no-op then.
    pub fn dispose(&self) {
        if self.shared.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        for task in tasks.drain(..) {
            task.abort();
        }
        debug!("habits container disposed");
    }

    fn spawn_populate(&self) {
        let shared = Arc::clone(&self.shared);
        let task = self.handle.spawn(async move {
            match shared.store.populate_if_empty().await {
                Ok(()) => info!("seeded initial habit counters"),
                Err(DomainError::StoreAlreadyPopulated) => {
                    debug!("store already populated, nothing to seed");
                }
                Err(error) => warn!(%error, "populating initial data failed"),
            }
        });
        self.track(task);
    }

    fn spawn_collection_subscription(&self) {
        let shared = Arc::clone(&self.shared);
        let task = self.handle.spawn(async move {
            let mut updates = shared.store.observe_all();
            while let Some(entries) = updates.next().await {
                let mut valid = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry {
                        Ok(counter) => valid.push(Ok(counter)),
                        Err(error) => {
                            warn!(%error, "dropping habit counter that failed validation");
                        }
                    }
                }
                shared.apply(move |state| state.counters = valid);
            }
            // The store closed its stream; keep serving the last snapshot.
            debug!("habit collection stream ended");
        });
        self.track(task);
    }

    fn track(&self, task: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|tracked| !tracked.is_finished());
        tasks.push(task);
    }
}

impl Drop for HabitsContainer {
    fn drop(&mut self) {
        self.dispose();
    }
}
