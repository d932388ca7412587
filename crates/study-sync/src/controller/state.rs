//! List State
//!
//! Each row keeps the last server-confirmed copy (`base`) plus the patches
//! dispatched but not yet settled. What the UI sees is always `base` with
//! those patches replayed in dispatch order, so a rollback is just dropping
//! one patch and replaying the rest.

use std::collections::{HashMap, HashSet};

use crate::domain::Entity;
use crate::error::SyncError;

pub(crate) type OpId = u64;

pub(crate) struct Row<E: Entity> {
    pub(crate) key: String,
    base: E,
    pending: Vec<(OpId, E::Patch)>,
    view: E,
}

impl<E: Entity> Row<E> {
    fn new(key: String, entity: E) -> Self {
        Self { key, view: entity.clone(), base: entity, pending: Vec::new() }
    }

    fn rebase(&mut self, base: E) {
        self.base = base;
        self.replay();
    }

    fn replay(&mut self) {
        let mut view = self.base.clone();
        for (_, patch) in &self.pending {
            view.apply(patch);
        }
        self.view = view;
    }
}

pub(crate) struct ListState<E: Entity> {
    rows: Vec<Row<E>>,
    /// Rows removed locally whose delete has not settled, with their index
    detached: HashMap<String, (usize, Row<E>)>,
    /// Temporary ids still waiting on their create
    provisional: HashSet<String>,
    /// Temporary id -> server id, for operations queued before confirmation
    aliases: HashMap<String, String>,
    /// Server id -> refresh generation current when its create confirmed
    confirmed_at: HashMap<String, u64>,
    next_temp: u64,
    next_op: OpId,
    pub(crate) refresh_generation: u64,
    pub(crate) last_error: Option<SyncError>,
}

impl<E: Entity> Default for ListState<E> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            detached: HashMap::new(),
            provisional: HashSet::new(),
            aliases: HashMap::new(),
            confirmed_at: HashMap::new(),
            next_temp: 0,
            next_op: 0,
            refresh_generation: 0,
            last_error: None,
        }
    }
}

impl<E: Entity> ListState<E> {
    pub(crate) fn views(&self) -> Vec<E> {
        self.rows.iter().map(|row| row.view.clone()).collect()
    }

    pub(crate) fn view(&self, key: &str) -> Option<&E> {
        self.rows.iter().find(|row| row.key == key).map(|row| &row.view)
    }

    /// Follow temporary ids to the server id they were confirmed as
    pub(crate) fn resolve(&self, id: &str) -> String {
        let mut key = id;
        while let Some(next) = self.aliases.get(key) {
            key = next.as_str();
        }
        key.to_string()
    }

    fn row_mut(&mut self, key: &str) -> Option<&mut Row<E>> {
        if let Some(index) = self.rows.iter().position(|row| row.key == key) {
            return Some(&mut self.rows[index]);
        }
        self.detached.get_mut(key).map(|(_, row)| row)
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.rows.iter().any(|row| row.key == key) || self.detached.contains_key(key)
    }

    pub(crate) fn is_detached(&self, key: &str) -> bool {
        self.detached.contains_key(key)
    }

    // ---- add ----

    /// Append a provisional row and return its temporary id
    pub(crate) fn insert_provisional(&mut self, draft: &E::Draft) -> String {
        self.next_temp += 1;
        let key = format!("local-{}", self.next_temp);
        self.rows.push(Row::new(key.clone(), E::provisional(key.clone(), draft)));
        self.provisional.insert(key.clone());
        key
    }

    /// Swap the provisional row for the server's entity
    pub(crate) fn confirm_create(&mut self, temp: &str, created: E) {
        let real = created.id().to_string();
        self.provisional.remove(temp);
        self.aliases.insert(temp.to_string(), real.clone());
        self.confirmed_at.insert(real.clone(), self.refresh_generation);

        // Removed while the create was in flight: the delete queued behind it
        // must find the row detached under the server id
        if let Some((index, mut row)) = self.detached.remove(temp) {
            if let Some(at) = self.rows.iter().position(|r| r.key == real) {
                let fetched = self.rows.remove(at);
                row.pending.extend(fetched.pending);
                row.pending.sort_by_key(|(op, _)| *op);
            }
            row.key = real.clone();
            row.rebase(created);
            self.detached.insert(real, (index, row));
            return;
        }

        // A refresh may already have brought the real row in
        if self.rows.iter().any(|row| row.key == real) {
            if let Some(index) = self.rows.iter().position(|row| row.key == temp) {
                let stale = self.rows.remove(index);
                if let Some(existing) = self.rows.iter_mut().find(|row| row.key == real) {
                    existing.pending.extend(stale.pending);
                    existing.pending.sort_by_key(|(op, _)| *op);
                    existing.rebase(created);
                }
            }
            return;
        }

        if let Some(row) = self.rows.iter_mut().find(|row| row.key == temp) {
            row.key = real;
            row.rebase(created);
        }
    }

    /// Drop a provisional row whose create failed
    pub(crate) fn discard_provisional(&mut self, temp: &str) {
        self.provisional.remove(temp);
        self.rows.retain(|row| row.key != temp);
        self.detached.remove(temp);
    }

    // ---- edit ----

    /// Apply a patch locally; `None` when the key is not a visible row
    pub(crate) fn push_patch(&mut self, key: &str, patch: E::Patch) -> Option<OpId> {
        let row = self.rows.iter_mut().find(|row| row.key == key)?;
        self.next_op += 1;
        row.pending.push((self.next_op, patch));
        row.replay();
        Some(self.next_op)
    }

    /// Settle a patch: confirmed with the server's copy, or dropped
    pub(crate) fn settle_patch(&mut self, key: &str, op: OpId, confirmed: Option<E>) {
        if let Some(row) = self.row_mut(key) {
            row.pending.retain(|(id, _)| *id != op);
            match confirmed {
                Some(entity) => row.rebase(entity),
                None => row.replay(),
            }
        }
    }

    // ---- remove ----

    pub(crate) fn detach(&mut self, key: &str) -> bool {
        match self.rows.iter().position(|row| row.key == key) {
            Some(index) => {
                let row = self.rows.remove(index);
                self.detached.insert(key.to_string(), (index, row));
                true
            }
            None => false,
        }
    }

    pub(crate) fn forget_detached(&mut self, key: &str) {
        self.detached.remove(key);
    }

    /// Put a row back where it was removed from
    pub(crate) fn reattach(&mut self, key: &str) {
        if let Some((index, row)) = self.detached.remove(key) {
            let at = index.min(self.rows.len());
            self.rows.insert(at, row);
        }
    }

    // ---- refresh ----

    /// Replace every confirmed row with the server's list. `issued` is the
    /// generation of the refresh that fetched it: rows still provisional, or
    /// confirmed after that request went out, are carried over.
    pub(crate) fn replace_all(&mut self, fresh: Vec<E>, issued: u64) {
        let previous = std::mem::take(&mut self.rows);
        let mut carried = Vec::new();
        let mut by_key: HashMap<String, Row<E>> = HashMap::new();
        for row in previous {
            if self.provisional.contains(&row.key) || self.confirmed_since(&row.key, issued) {
                carried.push(row.key.clone());
            }
            by_key.insert(row.key.clone(), row);
        }

        let mut seen = HashSet::new();
        for entity in fresh {
            let key = entity.id().to_string();
            if !seen.insert(key.clone()) {
                continue;
            }
            if let Some((_, row)) = self.detached.get_mut(&key) {
                // Still being deleted; keep it hidden but current
                row.rebase(entity);
                continue;
            }
            let row = match by_key.remove(&key) {
                Some(mut row) => {
                    row.rebase(entity);
                    row
                }
                None => Row::new(key, entity),
            };
            self.rows.push(row);
        }

        for key in carried {
            if let Some(row) = by_key.remove(&key) {
                self.rows.push(row);
            }
        }
        self.confirmed_at.retain(|_, at| *at > issued);
    }

    fn confirmed_since(&self, key: &str, issued: u64) -> bool {
        self.confirmed_at.get(key).is_some_and(|at| *at >= issued)
    }

    pub(crate) fn next_refresh(&mut self) -> u64 {
        self.refresh_generation += 1;
        self.refresh_generation
    }
}
