//! Optimistic List Controller
//!
//! Owns the in-memory list for one resource. Every mutation is applied
//! locally first, then sent to the [`RemoteStore`]; the response either
//! confirms the local change or rolls it back.
//!
//! The controller is a cheap `Clone` handle around `Rc` state and is meant
//! to live on one thread (the browser's UI thread). No `RefCell` borrow is
//! held across an `.await`.

mod queue;
mod state;

#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::domain::Entity;
use crate::error::{SyncError, SyncResult};
use crate::remote::{DraftOf, PatchOf, RemoteStore};
use queue::{Entry, SlotGuard, Slots};
use state::ListState;

/// Receives the rendered rows and the ids with remote calls in flight
type Listener<E> = Rc<dyn Fn(&[E], &[String])>;

pub struct OptimisticListController<S: RemoteStore> {
    store: Rc<S>,
    state: Rc<RefCell<ListState<S::Entity>>>,
    slots: Slots,
    listeners: Rc<RefCell<Vec<Listener<S::Entity>>>>,
}

impl<S: RemoteStore> Clone for OptimisticListController<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            state: self.state.clone(),
            slots: self.slots.clone(),
            listeners: self.listeners.clone(),
        }
    }
}

impl<S: RemoteStore> OptimisticListController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Rc::new(store),
            state: Rc::new(RefCell::new(ListState::default())),
            slots: Slots::default(),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    // ========================
    // Reads
    // ========================

    /// Current list as the UI should render it
    pub fn snapshot(&self) -> Vec<S::Entity> {
        self.state.borrow().views()
    }

    /// Look up by id, following a temporary id to its confirmed one
    pub fn get(&self, id: &str) -> Option<S::Entity> {
        let state = self.state.borrow();
        let key = state.resolve(id);
        state.view(&key).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().views().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True while a remote call for this id is in flight or queued
    pub fn is_pending(&self, id: &str) -> bool {
        let key = self.state.borrow().resolve(id);
        self.slots.is_busy(&key)
    }

    pub fn pending_ids(&self) -> Vec<String> {
        self.slots.busy_keys()
    }

    pub fn last_error(&self) -> Option<SyncError> {
        self.state.borrow().last_error.clone()
    }

    pub fn clear_error(&self) {
        self.state.borrow_mut().last_error = None;
        self.notify();
    }

    /// Called after every local change, dispatch or settlement
    pub fn subscribe(&self, listener: impl Fn(&[S::Entity], &[String]) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    // ========================
    // Mutations
    // ========================

    /// Show a provisional entry now, replace it with the server's on success
    pub async fn add(&self, draft: DraftOf<S>) -> SyncResult<S::Entity> {
        if let Err(err) = S::Entity::validate_draft(&draft) {
            return Err(self.fail(err));
        }

        let temp = self.state.borrow_mut().insert_provisional(&draft);
        let Entry::Held(mut guard) = self.slots.enter(&temp) else {
            // Temporary ids are fresh, nothing can be queued on them yet
            return Err(self.fail(SyncError::Disposed));
        };
        self.notify();
        debug!(id = %temp, "create dispatched");

        match self.store.create(&draft).await {
            Ok(created) => {
                let real = created.id().to_string();
                self.state.borrow_mut().confirm_create(&temp, created.clone());
                guard.rename(&real);
                drop(guard);
                info!(temp = %temp, id = %real, "create confirmed");
                self.notify();
                Ok(created)
            }
            Err(err) => {
                warn!(id = %temp, error = %err, "create failed, dropping provisional entry");
                self.state.borrow_mut().discard_provisional(&temp);
                drop(guard);
                Err(self.fail(err))
            }
        }
    }

    /// Patch the local copy now; send after any earlier call for this id settles
    pub async fn edit(&self, id: &str, patch: PatchOf<S>) -> SyncResult<S::Entity> {
        if let Err(err) = S::Entity::validate_patch(&patch) {
            return Err(self.fail(err));
        }

        let key = self.state.borrow().resolve(id);
        let Some(op) = self.state.borrow_mut().push_patch(&key, patch.clone()) else {
            return Err(self.fail(SyncError::not_found(id)));
        };
        self.notify();

        let guard = self.acquire(&key).await?;
        let key = guard.key().to_string();
        if !self.state.borrow().contains(&key) {
            // Create failed or a refresh dropped the row while we queued
            drop(guard);
            return Err(self.fail(SyncError::not_found(id)));
        }

        debug!(id = %key, "update dispatched");
        self.notify();
        let result = self.store.update(&key, &patch).await;
        drop(guard);

        match result {
            Ok(updated) => {
                self.state.borrow_mut().settle_patch(&key, op, Some(updated.clone()));
                info!(id = %key, "update confirmed");
                self.notify();
                Ok(updated)
            }
            Err(err) => {
                warn!(id = %key, error = %err, "update failed, rolling back");
                self.state.borrow_mut().settle_patch(&key, op, None);
                Err(self.fail(err))
            }
        }
    }

    /// Hide the entry now; put it back where it was if the delete fails
    pub async fn remove(&self, id: &str) -> SyncResult<()> {
        let key = self.state.borrow().resolve(id);
        if !self.state.borrow_mut().detach(&key) {
            return Err(self.fail(SyncError::not_found(id)));
        }
        self.notify();

        let guard = self.acquire(&key).await?;
        let key = guard.key().to_string();
        if !self.state.borrow().is_detached(&key) {
            // Its create failed, so the server never had it
            drop(guard);
            self.notify();
            return Ok(());
        }

        debug!(id = %key, "delete dispatched");
        let result = self.store.delete(&key).await;
        drop(guard);

        match result {
            Ok(()) => {
                self.state.borrow_mut().forget_detached(&key);
                info!(id = %key, "delete confirmed");
                self.notify();
                Ok(())
            }
            Err(err) => {
                warn!(id = %key, error = %err, "delete failed, restoring entry");
                self.state.borrow_mut().reattach(&key);
                Err(self.fail(err))
            }
        }
    }

    /// Replace the list with the server's; the most recently issued refresh wins
    pub async fn refresh(&self) -> SyncResult<()> {
        let generation = self.state.borrow_mut().next_refresh();
        let result = self.store.list().await;

        if self.state.borrow().refresh_generation != generation {
            debug!(generation, "discarding superseded refresh");
            return result.map(|_| ());
        }

        match result {
            Ok(fresh) => {
                debug!(count = fresh.len(), "list refreshed");
                self.state.borrow_mut().replace_all(fresh, generation);
                self.notify();
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    // ========================
    // Internals
    // ========================

    /// Wait for this id's turn; the returned guard follows id confirmation
    async fn acquire(&self, key: &str) -> SyncResult<SlotGuard> {
        match self.slots.enter(key) {
            Entry::Held(guard) => Ok(guard),
            Entry::Waiting(turn) => {
                debug!(id = %key, "queued behind in-flight call");
                // The guard carries the server id if the slot moved while we waited
                turn.await.map_err(|_| self.fail(SyncError::Disposed))
            }
        }
    }

    fn fail(&self, err: SyncError) -> SyncError {
        self.state.borrow_mut().last_error = Some(err.clone());
        self.notify();
        err
    }

    fn notify(&self) {
        let listeners: Vec<Listener<S::Entity>> = self.listeners.borrow().clone();
        if listeners.is_empty() {
            return;
        }
        let views = self.snapshot();
        let pending = self.pending_ids();
        for listener in listeners {
            listener(&views, &pending);
        }
    }
}
