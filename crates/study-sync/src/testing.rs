//! In-memory task backend for controller tests
//!
//! Every call yields to the executor at least once so concurrent operations
//! can interleave, and records `start`/`end` entries in a shared log.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::domain::{Entity, Task, TaskDraft, TaskPatch};
use crate::error::{SyncError, SyncResult};
use crate::remote::RemoteStore;

#[derive(Default)]
struct Inner {
    server: Vec<Task>,
    log: Vec<String>,
    ids: VecDeque<String>,
    issued: usize,
    failures: HashMap<&'static str, usize>,
    holds: HashMap<&'static str, VecDeque<oneshot::Receiver<()>>>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeStore {
    inner: Rc<RefCell<Inner>>,
}

impl FakeStore {
    pub(crate) fn with_tasks(tasks: Vec<Task>) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().server = tasks;
        store
    }

    /// Ids handed out by `create`, in order, before falling back to `srv-N`
    pub(crate) fn with_ids<const N: usize>(self, ids: [&str; N]) -> Self {
        self.inner.borrow_mut().ids.extend(ids.iter().map(|id| id.to_string()));
        self
    }

    /// Make the next call of `op` fail with a transport error
    pub(crate) fn fail_next(&self, op: &'static str) {
        *self.inner.borrow_mut().failures.entry(op).or_default() += 1;
    }

    /// Park the next call of `op` until the returned sender fires
    pub(crate) fn hold(&self, op: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner.borrow_mut().holds.entry(op).or_default().push_back(rx);
        tx
    }

    pub(crate) fn server(&self) -> Vec<Task> {
        self.inner.borrow().server.clone()
    }

    pub(crate) fn set_server(&self, tasks: Vec<Task>) {
        self.inner.borrow_mut().server = tasks;
    }

    pub(crate) fn log(&self) -> Vec<String> {
        self.inner.borrow().log.clone()
    }

    /// Number of calls made, any kind
    pub(crate) fn calls(&self) -> usize {
        self.inner.borrow().log.iter().filter(|line| line.starts_with("start")).count()
    }

    async fn enter(&self, op: &'static str, id: &str) -> SyncResult<()> {
        self.inner.borrow_mut().log.push(format!("start {} {}", op, id));
        let held = self.inner.borrow_mut().holds.get_mut(op).and_then(VecDeque::pop_front);
        if let Some(rx) = held {
            let _ = rx.await;
        }
        tokio::task::yield_now().await;

        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        if let Some(count) = inner.failures.get_mut(op).filter(|count| **count > 0) {
            *count -= 1;
            inner.log.push(format!("fail {} {}", op, id));
            return Err(SyncError::transport(format!("{} failed", op)));
        }
        Ok(())
    }

    fn finish(&self, op: &str, id: &str) {
        self.inner.borrow_mut().log.push(format!("end {} {}", op, id));
    }
}

pub(crate) fn task(id: &str, name: &str, subject: &str) -> Task {
    Task::provisional(id.to_string(), &TaskDraft::new(name, subject))
}

#[async_trait(?Send)]
impl RemoteStore for FakeStore {
    type Entity = Task;

    async fn list(&self) -> SyncResult<Vec<Task>> {
        // Snapshot before parking so a held list returns stale data
        let snapshot = self.server();
        self.enter("list", "*").await?;
        self.finish("list", "*");
        Ok(snapshot)
    }

    async fn create(&self, draft: &TaskDraft) -> SyncResult<Task> {
        self.enter("create", &draft.name).await?;
        let created = {
            let mut inner = self.inner.borrow_mut();
            inner.issued += 1;
            let fallback = format!("srv-{}", inner.issued);
            let id = inner.ids.pop_front().unwrap_or(fallback);
            let created = Task::provisional(id, draft);
            inner.server.push(created.clone());
            created
        };
        self.finish("create", &created.id);
        Ok(created)
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> SyncResult<Task> {
        self.enter("update", id).await?;
        let updated = {
            let mut inner = self.inner.borrow_mut();
            let task = inner
                .server
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or_else(|| SyncError::transport("Task not found"))?;
            task.apply(patch);
            task.clone()
        };
        self.finish("update", id);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> SyncResult<()> {
        self.enter("delete", id).await?;
        {
            let mut inner = self.inner.borrow_mut();
            let before = inner.server.len();
            inner.server.retain(|task| task.id != id);
            if inner.server.len() == before {
                return Err(SyncError::transport("Task not found"));
            }
        }
        self.finish("delete", id);
        Ok(())
    }
}
