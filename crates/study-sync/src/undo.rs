//! Undo for Board Actions
//!
//! The board offers to reverse the last move or delete for a few seconds.
//! Reversing goes through the list controller like any other change: a
//! move is undone with a status edit, a delete by creating the task again.

use tracing::info;

use crate::controller::OptimisticListController;
use crate::domain::{ApiStatus, Task, TaskDraft, TaskPatch};
use crate::error::SyncResult;
use crate::remote::RemoteStore;

/// How long the undo offer stays up
pub const UNDO_WINDOW_MS: u32 = 5_000;

/// A confirmed board change that can be reversed
#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    Move { id: String, previous: ApiStatus },
    Delete { task: Task },
}

impl UndoAction {
    /// Status change of `task`, taken before the move
    pub fn moved(task: &Task) -> Self {
        UndoAction::Move { id: task.id.clone(), previous: task.status }
    }

    pub fn deleted(task: Task) -> Self {
        UndoAction::Delete { task }
    }

    pub fn label(&self) -> String {
        match self {
            UndoAction::Move { previous, .. } => format!("Task moved from {}", previous.display().label()),
            UndoAction::Delete { task } => format!("Deleted \"{}\"", task.name),
        }
    }

    /// Apply the reverse change. A restored task gets a new server id.
    pub async fn revert<S>(self, controller: &OptimisticListController<S>) -> SyncResult<Task>
    where
        S: RemoteStore<Entity = Task>,
    {
        match self {
            UndoAction::Move { id, previous } => {
                info!(id = %id, status = previous.as_str(), "undoing move");
                controller.edit(&id, TaskPatch::status(previous)).await
            }
            UndoAction::Delete { task } => {
                info!(id = %task.id, "undoing delete");
                controller.add(TaskDraft::from(&task)).await
            }
        }
    }
}

/// The single action currently on offer. Recording a new one replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UndoHistory {
    latest: Option<(u64, UndoAction)>,
    issued: u64,
}

impl UndoHistory {
    /// Offer `action` and return the ticket that expires it
    pub fn record(&mut self, action: UndoAction) -> u64 {
        self.issued += 1;
        self.latest = Some((self.issued, action));
        self.issued
    }

    pub fn current(&self) -> Option<&UndoAction> {
        self.latest.as_ref().map(|(_, action)| action)
    }

    /// Withdraw the offer if `ticket` is still the latest one
    pub fn expire(&mut self, ticket: u64) -> bool {
        match &self.latest {
            Some((current, _)) if *current == ticket => {
                self.latest = None;
                true
            }
            _ => false,
        }
    }

    /// Claim the action to run it
    pub fn take(&mut self) -> Option<UndoAction> {
        self.latest.take().map(|(_, action)| action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DisplayStatus;
    use crate::drag::DragDropReorder;
    use crate::testing::{task, FakeStore};

    async fn board(store: &FakeStore) -> OptimisticListController<FakeStore> {
        let controller = OptimisticListController::new(store.clone());
        controller.refresh().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_undo_move_restores_previous_status() {
        let store = FakeStore::with_tasks(vec![task("t1", "Essay", "English")]);
        let controller = board(&store).await;

        let mut drag = DragDropReorder::new();
        drag.begin(&controller.get("t1").unwrap());
        let action = drag.drop_on(DisplayStatus::Completed).send(&controller).await.unwrap().unwrap();
        assert_eq!(store.server()[0].status, ApiStatus::Completed);

        let mut history = UndoHistory::default();
        history.record(action);
        let restored = history.take().unwrap().revert(&controller).await.unwrap();

        assert_eq!(restored.status, ApiStatus::Pending);
        assert_eq!(store.server()[0].status, ApiStatus::Pending);
        assert_eq!(controller.get("t1").unwrap().display_status(), DisplayStatus::Pending);
    }

    #[tokio::test]
    async fn test_undo_delete_recreates_task() {
        let mut original = task("t1", "Essay", "English");
        original.description = Some("Draft intro".into());
        original.status = ApiStatus::InProgress;
        let store = FakeStore::with_tasks(vec![original]).with_ids(["t9"]);
        let controller = board(&store).await;

        let snapshot = controller.get("t1").unwrap();
        controller.remove("t1").await.unwrap();
        assert!(store.server().is_empty());

        let restored = UndoAction::deleted(snapshot).revert(&controller).await.unwrap();

        assert_eq!(restored.id, "t9");
        assert_eq!(restored.name, "Essay");
        assert_eq!(restored.subject, "English");
        assert_eq!(restored.description.as_deref(), Some("Draft intro"));
        assert_eq!(restored.status, ApiStatus::InProgress);
        assert_eq!(controller.snapshot(), store.server());
    }

    #[test]
    fn test_newer_action_replaces_offer() {
        let mut history = UndoHistory::default();
        let first = history.record(UndoAction::moved(&task("t1", "A", "S")));
        let second = history.record(UndoAction::deleted(task("t2", "B", "S")));

        // The first offer's timer runs out after the second was recorded
        assert!(!history.expire(first));
        assert_eq!(history.current().map(UndoAction::label), Some("Deleted \"B\"".to_string()));

        assert!(history.expire(second));
        assert_eq!(history.current(), None);
        assert_eq!(history.take(), None);
    }

    #[test]
    fn test_move_label_names_previous_column() {
        let mut essay = task("t1", "Essay", "English");
        essay.status = ApiStatus::InProgress;
        assert_eq!(UndoAction::moved(&essay).label(), "Task moved from Ongoing");
    }
}
