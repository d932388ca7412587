//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The lists are
//! mirrors of the list controllers: controllers own the data, the store
//! only re-renders it.

use leptos::prelude::*;
use reactive_stores::Store;
use study_sync::{StudyMaterial, Task, User};

/// Dashboard state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct DashboardState {
    /// Signed-in user, if any
    pub user: Option<User>,
    /// Tasks as currently shown (optimistic)
    pub tasks: Vec<Task>,
    /// Task ids with a remote call in flight
    pub pending_tasks: Vec<String>,
    pub materials: Vec<StudyMaterial>,
    pub pending_materials: Vec<String>,
    /// First load finished for each list
    pub tasks_loaded: bool,
    pub materials_loaded: bool,
}

/// Type alias for the store
pub type DashboardStore = Store<DashboardState>;

/// Get the dashboard store from context
pub fn use_dashboard_store() -> DashboardStore {
    expect_context::<DashboardStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace the task mirror after a controller change
pub fn store_set_tasks(store: &DashboardStore, rows: &[Task], pending: &[String]) {
    *store.tasks().write() = rows.to_vec();
    *store.pending_tasks().write() = pending.to_vec();
}

pub fn store_set_materials(store: &DashboardStore, rows: &[StudyMaterial], pending: &[String]) {
    *store.materials().write() = rows.to_vec();
    *store.pending_materials().write() = pending.to_vec();
}

/// Tracked: is a call for this task in flight
pub fn store_task_pending(store: &DashboardStore, id: &str) -> bool {
    store.pending_tasks().read().iter().any(|p| p == id)
}

pub fn store_material_pending(store: &DashboardStore, id: &str) -> bool {
    store.pending_materials().read().iter().any(|p| p == id)
}

/// Drop everything tied to the previous user
pub fn store_clear_session(store: &DashboardStore) {
    *store.user().write() = None;
    store.tasks().write().clear();
    store.pending_tasks().write().clear();
    store.materials().write().clear();
    store.pending_materials().write().clear();
    *store.tasks_loaded().write() = false;
    *store.materials_loaded().write() = false;
}
