//! Study Sync
//!
//! Client-side core of the study dashboard: backend entities, HTTP stores,
//! and the optimistic list controller that keeps the UI ahead of the
//! network while staying consistent with it.

pub mod config;
pub mod controller;
pub mod domain;
pub mod drag;
pub mod error;
pub mod filter;
pub mod remote;
pub mod session;
pub mod transfer;
pub mod undo;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ApiConfig;
pub use controller::OptimisticListController;
pub use domain::{
    ApiStatus, Credentials, DisplayStatus, Entity, MaterialDraft, MaterialPatch, MaterialPayload, Registration,
    StatusMapper, StudyMaterial, Task, TaskDraft, TaskPatch, User,
};
pub use drag::{DragDropReorder, DropOutcome};
pub use error::{SyncError, SyncResult};
pub use filter::{subjects, MaterialFilter, StatusCounts, TaskFilter};
pub use remote::{AssistantClient, Attachment, AuthClient, HttpClient, HttpMaterialStore, HttpTaskStore, RemoteStore};
pub use session::{GateDecision, MemoryStorage, Route, SessionGate, SessionStorage};
pub use transfer::{export_board, import_tasks, parse_import, ImportSummary};
pub use undo::{UndoAction, UndoHistory, UNDO_WINDOW_MS};

/// Controller over the tasks endpoint
pub type TaskList = OptimisticListController<HttpTaskStore>;
/// Controller over the study-materials endpoint
pub type MaterialList = OptimisticListController<HttpMaterialStore>;
