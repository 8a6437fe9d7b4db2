//! Observable holder for the form record.
//!
//! All edits go through [`FormState`]. After each edit every subscriber is
//! called with the new snapshot, so views re-render by reading current state
//! instead of relying on hidden mutation.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::model::{CoverPageData, FieldUpdate, FieldUpdateError};

/// Callback invoked with the record after every change.
pub type Listener = Arc<dyn Fn(&CoverPageData) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct FormState {
    data: RwLock<CoverPageData>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl FormState {
    pub fn new(data: CoverPageData) -> Self {
        Self {
            data: RwLock::new(data),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Current record.
    pub fn snapshot(&self) -> CoverPageData {
        self.data.read().clone()
    }

    pub fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, listener));
        id
    }

    /// Returns false when the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Mutate the record in place and notify subscribers.
    pub fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut CoverPageData),
    {
        let snapshot = {
            let mut data = self.data.write();
            mutate(&mut data);
            data.clone()
        };
        self.notify(&snapshot);
    }

    /// Apply a single field edit. Nothing changes and nobody is notified when
    /// the edit is rejected.
    pub fn apply(&self, update: &FieldUpdate) -> Result<(), FieldUpdateError> {
        self.apply_all(std::slice::from_ref(update))
    }

    /// Apply a batch of edits as one change. Either every edit lands and
    /// subscribers hear about the result once, or the record is left as it was.
    pub fn apply_all(&self, updates: &[FieldUpdate]) -> Result<(), FieldUpdateError> {
        let snapshot = {
            let mut data = self.data.write();
            let mut next = data.clone();
            for update in updates {
                update.apply_to(&mut next)?;
            }
            *data = next.clone();
            next
        };
        self.notify(&snapshot);
        Ok(())
    }

    pub fn replace(&self, data: CoverPageData) {
        self.update(move |current| *current = data);
    }

    fn notify(&self, snapshot: &CoverPageData) {
        // Listeners are cloned out so they may call back into this state.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(CoverPageData::default())
    }
}
