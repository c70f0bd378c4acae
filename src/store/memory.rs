/// In-memory habit store
///
/// Reference implementation of `HabitStore` over a mutex-guarded vector,
/// publishing collection snapshots through a watch channel. Used by the demo
/// binary and the test suite; real persistence lives behind the same trait
/// elsewhere.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::{DomainError, HabitCounter};
use crate::store::{CounterSnapshot, HabitStore};

/// Errors specific to the in-memory store
#[derive(Error, Debug)]
pub enum MemoryStoreError {
    #[error("no habit counter with id {0}")]
    UnknownId(u32),
}

struct Inner {
    counters: Vec<HabitCounter>,
    next_id: u32,
}

/// Mutex-guarded counter collection with an observable snapshot feed
///
/// The mutex doubles as the per-id serialization point for `increase`, so
/// two racing increases of the same counter cannot both pass the
/// once-per-day check.
pub struct MemoryStore {
    inner: Mutex<Inner>,
    snapshot_tx: watch::Sender<CounterSnapshot>,
    seed: Vec<String>,
}

impl MemoryStore {
    /// Create an empty store with no seed data
    pub fn new() -> Self {
        Self::with_seed::<&str>(&[])
    }

    /// Create an empty store that `populate_if_empty` seeds with these names
    pub fn with_seed<S: AsRef<str>>(seed: &[S]) -> Self {
        let (snapshot_tx, _) = watch::channel(Vec::new());
        Self {
            inner: Mutex::new(Inner {
                counters: Vec::new(),
                next_id: 1,
            }),
            snapshot_tx,
            seed: seed.iter().map(|name| name.as_ref().to_string()).collect(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        let snapshot = inner.counters.iter().cloned().map(Ok).collect();
        self.snapshot_tx.send_replace(snapshot);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HabitStore for MemoryStore {
    fn observe_all(&self) -> BoxStream<'static, CounterSnapshot> {
        let receiver = self.snapshot_tx.subscribe();
        // Yield the current snapshot first, then follow the watch channel.
        futures::stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if first {
                let snapshot = receiver.borrow_and_update().clone();
                return Some((snapshot, (receiver, false)));
            }
            match receiver.changed().await {
                Ok(()) => {
                    let snapshot = receiver.borrow_and_update().clone();
                    Some((snapshot, (receiver, false)))
                }
                Err(_) => None,
            }
        })
        .boxed()
    }

    async fn increase(&self, id: u32) -> Result<(), DomainError> {
        let mut inner = self.lock();
        let slot = inner
            .counters
            .iter_mut()
            .find(|counter| counter.id() == Some(id))
            .ok_or_else(|| DomainError::store_failure(MemoryStoreError::UnknownId(id)))?;

        let increased = slot.increased()?;
        *slot = increased;
        self.publish(&inner);
        Ok(())
    }

    async fn populate_if_empty(&self) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if !inner.counters.is_empty() {
            return Err(DomainError::StoreAlreadyPopulated);
        }
        for name in &self.seed {
            let id = inner.next_id;
            let counter = HabitCounter::pending(name)?.promoted(id)?;
            inner.counters.push(counter);
            inner.next_id += 1;
        }
        self.publish(&inner);
        Ok(())
    }
}
