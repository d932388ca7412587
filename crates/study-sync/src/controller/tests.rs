//! Optimistic List Controller Tests

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::domain::{ApiStatus, DisplayStatus, Task, TaskDraft, TaskPatch};
use crate::testing::{task, FakeStore};

fn ids(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(|t| t.id.clone()).collect()
}

async fn loaded(store: FakeStore) -> OptimisticListController<FakeStore> {
    let controller = OptimisticListController::new(store);
    controller.refresh().await.unwrap();
    controller
}

// ========================
// add
// ========================

#[tokio::test]
async fn test_add_shows_temporary_row_then_server_id() {
    let store = FakeStore::default().with_ids(["abc123"]);
    let controller = OptimisticListController::new(store.clone());
    let gate = store.hold("create");

    let observe = async {
        let rows = controller.snapshot();
        assert_eq!(ids(&rows), vec!["local-1"]);
        assert_eq!(rows[0].display_status(), DisplayStatus::Pending);
        assert!(controller.is_pending("local-1"));
        gate.send(()).unwrap();
    };
    let (created, ()) = futures::join!(controller.add(TaskDraft::new("Read Ch.4", "Physics")), observe);

    let created = created.unwrap();
    assert_eq!(created.id, "abc123");
    assert_eq!(ids(&controller.snapshot()), vec!["abc123"]);
    assert!(controller.get("local-1").is_some_and(|t| t.id == "abc123"));
    assert!(controller.pending_ids().is_empty());
}

#[tokio::test]
async fn test_failed_add_removes_provisional_row() {
    let store = FakeStore::with_tasks(vec![task("t1", "Existing", "DSA")]);
    let controller = loaded(store.clone()).await;
    store.fail_next("create");

    let err = controller.add(TaskDraft::new("Doomed", "DSA")).await.unwrap_err();

    assert_eq!(err, SyncError::transport("create failed"));
    assert_eq!(ids(&controller.snapshot()), vec!["t1"]);
    assert_eq!(controller.last_error(), Some(err));
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_store() {
    let store = FakeStore::default();
    let controller = OptimisticListController::new(store.clone());

    let err = controller.add(TaskDraft::new("   ", "DSA")).await.unwrap_err();

    assert!(matches!(err, SyncError::Validation(_)));
    assert!(controller.is_empty());
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_edit_queued_behind_create_targets_server_id() {
    let store = FakeStore::default().with_ids(["abc123"]);
    let controller = OptimisticListController::new(store.clone());

    let (created, edited) = futures::join!(
        controller.add(TaskDraft::new("Read", "Physics")),
        controller.edit("local-1", TaskPatch::status(ApiStatus::InProgress)),
    );

    assert_eq!(created.unwrap().id, "abc123");
    assert_eq!(edited.unwrap().status, ApiStatus::InProgress);
    assert_eq!(
        store.log(),
        vec!["start create Read", "end create abc123", "start update abc123", "end update abc123"]
    );
    assert_eq!(store.server()[0].status, ApiStatus::InProgress);
    assert_eq!(controller.snapshot(), store.server());
}

// ========================
// edit
// ========================

#[tokio::test]
async fn test_failed_edit_rolls_back() {
    let store = FakeStore::with_tasks(vec![task("t1", "Essay", "English")]);
    let controller = loaded(store.clone()).await;
    store.fail_next("update");
    let gate = store.hold("update");

    let observe = async {
        let optimistic = controller.get("t1").unwrap();
        assert_eq!(optimistic.display_status(), DisplayStatus::Completed);
        gate.send(()).unwrap();
    };
    let (result, ()) =
        futures::join!(controller.edit("t1", TaskPatch::status(ApiStatus::Completed)), observe);

    assert!(result.is_err());
    assert_eq!(controller.get("t1").unwrap().display_status(), DisplayStatus::Pending);
    assert!(matches!(controller.last_error(), Some(SyncError::Transport { .. })));
}

#[tokio::test]
async fn test_rapid_edits_are_serialized() {
    let store = FakeStore::with_tasks(vec![task("t1", "Essay", "English")]);
    let controller = loaded(store.clone()).await;

    let (first, second) = futures::join!(
        controller.edit("t1", TaskPatch::status(ApiStatus::InProgress)),
        controller.edit("t1", TaskPatch::rename("Final essay")),
    );
    first.unwrap();
    second.unwrap();

    let log: Vec<String> = store.log().into_iter().filter(|line| line.contains("update")).collect();
    assert_eq!(log, vec!["start update t1", "end update t1", "start update t1", "end update t1"]);

    let server = &store.server()[0];
    assert_eq!(server.status, ApiStatus::InProgress);
    assert_eq!(server.name, "Final essay");
    assert_eq!(controller.snapshot(), store.server());
}

#[tokio::test]
async fn test_rollback_keeps_later_pending_edit() {
    let store = FakeStore::with_tasks(vec![task("t1", "Essay", "English")]);
    let controller = loaded(store.clone()).await;
    store.fail_next("update");

    let (first, second) = futures::join!(
        controller.edit("t1", TaskPatch::status(ApiStatus::Completed)),
        controller.edit("t1", TaskPatch::rename("Essay v2")),
    );

    assert!(first.is_err());
    assert!(second.is_ok());
    let row = controller.get("t1").unwrap();
    assert_eq!(row.status, ApiStatus::Pending);
    assert_eq!(row.name, "Essay v2");
}

#[tokio::test]
async fn test_edit_unknown_id_is_not_found() {
    let controller = OptimisticListController::new(FakeStore::default());
    let err = controller.edit("ghost", TaskPatch::rename("x")).await.unwrap_err();
    assert_eq!(err, SyncError::not_found("ghost"));
}

// ========================
// remove
// ========================

#[tokio::test]
async fn test_remove_hides_row_until_confirmed() {
    let store = FakeStore::with_tasks(vec![task("a", "A", "S"), task("b", "B", "S")]);
    let controller = loaded(store.clone()).await;
    let gate = store.hold("delete");

    let observe = async {
        assert_eq!(ids(&controller.snapshot()), vec!["a"]);
        assert!(controller.is_pending("b"));
        gate.send(()).unwrap();
    };
    let (result, ()) = futures::join!(controller.remove("b"), observe);

    result.unwrap();
    assert_eq!(ids(&controller.snapshot()), vec!["a"]);
    assert_eq!(ids(&store.server()), vec!["a"]);
}

#[tokio::test]
async fn test_failed_remove_restores_original_position() {
    let store = FakeStore::with_tasks(vec![task("a", "A", "S"), task("b", "B", "S"), task("c", "C", "S")]);
    let controller = loaded(store.clone()).await;
    store.fail_next("delete");

    assert!(controller.remove("b").await.is_err());
    assert_eq!(ids(&controller.snapshot()), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_remove_of_failed_create_skips_store() {
    let store = FakeStore::default();
    let controller = OptimisticListController::new(store.clone());
    store.fail_next("create");

    let (created, removed) =
        futures::join!(controller.add(TaskDraft::new("Oops", "S")), controller.remove("local-1"));

    assert!(created.is_err());
    assert!(removed.is_ok());
    assert!(controller.is_empty());
    assert!(!store.log().iter().any(|line| line.contains("delete")));
}

#[tokio::test]
async fn test_remove_during_create_deletes_row_a_refresh_brought_back() {
    let store = FakeStore::default().with_ids(["abc123"]);
    let controller = OptimisticListController::new(store.clone());
    let gate = store.hold("create");

    let meanwhile = async {
        let reload = async {
            store.set_server(vec![task("abc123", "Read", "S")]);
            controller.refresh().await.unwrap();
            assert_eq!(ids(&controller.snapshot()), vec!["abc123"]);
            gate.send(()).unwrap();
        };
        let (removed, ()) = futures::join!(controller.remove("local-1"), reload);
        removed
    };
    let (created, removed) = futures::join!(controller.add(TaskDraft::new("Read", "S")), meanwhile);

    assert_eq!(created.unwrap().id, "abc123");
    removed.unwrap();
    assert!(controller.is_empty());
    assert!(store.log().contains(&"start delete abc123".to_string()));
    assert!(store.server().is_empty());
    assert!(controller.pending_ids().is_empty());
}

// ========================
// refresh
// ========================

#[tokio::test]
async fn test_successful_sequence_matches_fresh_reload() {
    let store = FakeStore::with_tasks(vec![task("a", "A", "Maths"), task("b", "B", "Maths")]);
    let controller = loaded(store.clone()).await;

    controller.add(TaskDraft::new("C", "Physics")).await.unwrap();
    controller.edit("a", TaskPatch::status(ApiStatus::Completed)).await.unwrap();
    controller.remove("b").await.unwrap();
    let optimistic = controller.snapshot();

    let reloaded = loaded(store.clone()).await;
    assert_eq!(optimistic, reloaded.snapshot());
}

#[tokio::test]
async fn test_stale_refresh_is_discarded() {
    let store = FakeStore::with_tasks(vec![task("old", "Old", "S")]);
    let controller = OptimisticListController::new(store.clone());
    let gate = store.hold("list");

    let newer = async {
        store.set_server(vec![task("new", "New", "S")]);
        controller.refresh().await.unwrap();
        gate.send(()).unwrap();
    };
    let (older, ()) = futures::join!(controller.refresh(), newer);

    older.unwrap();
    assert_eq!(ids(&controller.snapshot()), vec!["new"]);
}

#[tokio::test]
async fn test_refresh_failure_keeps_list() {
    let store = FakeStore::with_tasks(vec![task("a", "A", "S")]);
    let controller = loaded(store.clone()).await;
    store.fail_next("list");

    assert!(controller.refresh().await.is_err());
    assert_eq!(ids(&controller.snapshot()), vec!["a"]);

    controller.clear_error();
    assert_eq!(controller.last_error(), None);
}

#[tokio::test]
async fn test_refresh_keeps_provisional_rows() {
    let store = FakeStore::with_tasks(vec![task("a", "A", "S")]);
    let controller = OptimisticListController::new(store.clone());
    let gate = store.hold("create");

    let during = async {
        controller.refresh().await.unwrap();
        assert_eq!(ids(&controller.snapshot()), vec!["a", "local-1"]);
        gate.send(()).unwrap();
    };
    let (created, ()) = futures::join!(controller.add(TaskDraft::new("B", "S")), during);

    created.unwrap();
    assert_eq!(ids(&controller.snapshot()), vec!["a", "srv-1"]);
}

#[tokio::test]
async fn test_refresh_issued_before_create_confirms_keeps_created_row() {
    let store = FakeStore::default();
    let controller = OptimisticListController::new(store.clone());
    let gate = store.hold("list");

    let create = async {
        let created = controller.add(TaskDraft::new("Read", "S")).await;
        gate.send(()).unwrap();
        created
    };
    let (refreshed, created) = futures::join!(controller.refresh(), create);

    refreshed.unwrap();
    assert_eq!(created.unwrap().id, "srv-1");
    assert_eq!(ids(&controller.snapshot()), vec!["srv-1"]);
    assert_eq!(controller.snapshot(), store.server());

    // The next refresh sees the row on the server as usual
    controller.refresh().await.unwrap();
    assert_eq!(ids(&controller.snapshot()), vec!["srv-1"]);
}

#[tokio::test]
async fn test_refresh_after_confirmation_drops_row_deleted_elsewhere() {
    let store = FakeStore::default();
    let controller = OptimisticListController::new(store.clone());
    controller.add(TaskDraft::new("Read", "S")).await.unwrap();

    store.set_server(Vec::new());
    controller.refresh().await.unwrap();

    assert!(controller.is_empty());
}

// ========================
// subscribers
// ========================

#[tokio::test]
async fn test_subscribers_see_each_change() {
    let store = FakeStore::default().with_ids(["x1"]);
    let controller = OptimisticListController::new(store);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    controller.subscribe(move |rows, pending| sink.borrow_mut().push((ids(rows), pending.to_vec())));

    controller.add(TaskDraft::new("Read", "S")).await.unwrap();

    let local = vec!["local-1".to_string()];
    let confirmed = vec!["x1".to_string()];
    assert_eq!(*seen.borrow(), vec![(local.clone(), local), (confirmed, Vec::new())]);
}
