//! Kanban Drag State
//!
//! Tracks the task being dragged between status columns. A drop resolves
//! to a status patch for the list controller, or to nothing when the task
//! lands back in its own column.

use tracing::debug;

use crate::controller::OptimisticListController;
use crate::domain::{ApiStatus, DisplayStatus, StatusMapper, Task, TaskPatch};
use crate::error::SyncResult;
use crate::remote::RemoteStore;
use crate::undo::UndoAction;

/// What a drop amounts to
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Dropped on its own column
    NoOp,
    /// Status change to hand to the controller
    Move { id: String, previous: ApiStatus, patch: TaskPatch },
    /// Nothing was being dragged
    Ignored,
}

impl DropOutcome {
    /// Send the status change, if any. A confirmed move comes back as the
    /// action that reverses it.
    pub async fn send<S>(&self, controller: &OptimisticListController<S>) -> SyncResult<Option<UndoAction>>
    where
        S: RemoteStore<Entity = Task>,
    {
        let DropOutcome::Move { id, previous, patch } = self else {
            return Ok(None);
        };
        let moved = controller.edit(id, patch.clone()).await?;
        Ok(Some(UndoAction::Move { id: moved.id, previous: *previous }))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Dragged {
    id: String,
    status: ApiStatus,
}

#[derive(Debug, Clone, Default)]
pub struct DragDropReorder {
    dragging: Option<Dragged>,
    hovered: Option<DisplayStatus>,
}

impl DragDropReorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a task. Replaces any drag already in progress.
    pub fn begin(&mut self, task: &Task) {
        if let Some(previous) = self.dragging.take() {
            debug!(id = %previous.id, "drag superseded");
        }
        self.hovered = None;
        self.dragging = Some(Dragged { id: task.id.clone(), status: task.status });
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    pub fn dragged_id(&self) -> Option<&str> {
        self.dragging.as_ref().map(|d| d.id.as_str())
    }

    pub fn hover(&mut self, column: Option<DisplayStatus>) {
        if self.dragging.is_some() {
            self.hovered = column;
        }
    }

    /// Column currently under the pointer while dragging
    pub fn hovered(&self) -> Option<DisplayStatus> {
        self.hovered
    }

    pub fn drop_on(&mut self, column: DisplayStatus) -> DropOutcome {
        self.hovered = None;
        let Some(dragged) = self.dragging.take() else {
            return DropOutcome::Ignored;
        };
        let from = dragged.status.display();
        if from == column {
            return DropOutcome::NoOp;
        }
        debug!(id = %dragged.id, from = from.as_str(), to = column.as_str(), "task dropped");
        DropOutcome::Move {
            id: dragged.id,
            previous: dragged.status,
            patch: TaskPatch::status(StatusMapper::to_api(column)),
        }
    }

    pub fn cancel(&mut self) {
        self.dragging = None;
        self.hovered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{task, FakeStore};

    #[tokio::test]
    async fn test_drop_on_same_column_makes_no_call() {
        let store = FakeStore::with_tasks(vec![task("t1", "Essay", "English")]);
        let controller = OptimisticListController::new(store.clone());
        controller.refresh().await.unwrap();
        let calls = store.calls();

        let mut drag = DragDropReorder::new();
        drag.begin(&controller.get("t1").unwrap());
        let outcome = drag.drop_on(DisplayStatus::Pending);

        assert_eq!(outcome, DropOutcome::NoOp);
        assert_eq!(outcome.send(&controller).await.unwrap(), None);
        assert_eq!(store.calls(), calls);
        assert!(!drag.is_dragging());
    }

    #[tokio::test]
    async fn test_drop_on_other_column_edits_status() {
        let store = FakeStore::with_tasks(vec![task("t1", "Essay", "English")]);
        let controller = OptimisticListController::new(store.clone());
        controller.refresh().await.unwrap();

        let mut drag = DragDropReorder::new();
        drag.begin(&controller.get("t1").unwrap());
        let outcome = drag.drop_on(DisplayStatus::Ongoing);

        assert_eq!(
            outcome,
            DropOutcome::Move {
                id: "t1".into(),
                previous: ApiStatus::Pending,
                patch: TaskPatch::status(ApiStatus::InProgress),
            }
        );
        let undo = outcome.send(&controller).await.unwrap();
        assert_eq!(undo, Some(UndoAction::Move { id: "t1".into(), previous: ApiStatus::Pending }));
        assert_eq!(store.server()[0].status, ApiStatus::InProgress);
        assert_eq!(controller.get("t1").unwrap().display_status(), DisplayStatus::Ongoing);
    }

    #[test]
    fn test_drop_while_idle_is_ignored() {
        let mut drag = DragDropReorder::new();
        assert_eq!(drag.drop_on(DisplayStatus::Completed), DropOutcome::Ignored);

        drag.begin(&task("t1", "A", "S"));
        drag.cancel();
        assert_eq!(drag.drop_on(DisplayStatus::Completed), DropOutcome::Ignored);
    }

    #[test]
    fn test_new_drag_replaces_previous() {
        let mut drag = DragDropReorder::new();
        drag.begin(&task("t1", "A", "S"));
        drag.hover(Some(DisplayStatus::Ongoing));
        drag.begin(&task("t2", "B", "S"));

        assert_eq!(drag.dragged_id(), Some("t2"));
        assert_eq!(drag.hovered(), None);
        assert!(matches!(drag.drop_on(DisplayStatus::Completed), DropOutcome::Move { id, .. } if id == "t2"));
        assert_eq!(drag.drop_on(DisplayStatus::Completed), DropOutcome::Ignored);
    }

    #[test]
    fn test_hover_ignored_when_idle() {
        let mut drag = DragDropReorder::new();
        drag.hover(Some(DisplayStatus::Completed));
        assert_eq!(drag.hovered(), None);
    }
}
