/// One-shot UI effects and their FIFO queue
///
/// Effects are instructions that make no sense as durable state: once acted
/// on, they are gone. The queue's depth is observable through a watch channel
/// so a collaborator can be woken to drain it.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

/// Instructions for the UI collaborator, consumed exactly once each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    RequestFocusOnNewHabitInput,
    HideKeyboard,
}

/// Platform keyboard handle the effect drain loop talks to
///
/// Best-effort on both calls; implementations report nothing back.
pub trait Keyboard {
    fn show(&self);
    fn hide(&self);
}

/// Ordered queue of pending effects
///
/// Strictly FIFO. Consumers are expected to call `consume_next` only after
/// the depth signal reports a pending effect, so an empty pop returns `None`
/// rather than blocking.
pub struct EffectQueue {
    queue: Mutex<VecDeque<Effect>>,
    depth_tx: watch::Sender<usize>,
}

impl EffectQueue {
    pub fn new() -> Self {
        let (depth_tx, _) = watch::channel(0);
        Self {
            queue: Mutex::new(VecDeque::new()),
            depth_tx,
        }
    }

    /// Append an effect and publish the new depth
    pub fn enqueue(&self, effect: Effect) {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.push_back(effect);
        self.depth_tx.send_replace(queue.len());
    }

    /// Remove and return the oldest pending effect, if any
    pub fn consume_next(&self) -> Option<Effect> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let effect = queue.pop_front();
        if effect.is_some() {
            self.depth_tx.send_replace(queue.len());
        }
        effect
    }

    /// Observe the queue depth; a value above zero means effects are pending
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.depth_tx.subscribe()
    }
}

impl Default for EffectQueue {
    fn default() -> Self {
        Self::new()
    }
}
