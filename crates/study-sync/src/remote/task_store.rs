//! Task Store
//!
//! `/tasks` over JSON.

use async_trait::async_trait;
use tracing::debug;

use super::http::HttpClient;
use super::traits::RemoteStore;
use crate::config::ApiConfig;
use crate::domain::{Task, TaskDraft, TaskPatch};
use crate::error::SyncResult;

#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    http: HttpClient,
    base: String,
}

impl HttpTaskStore {
    pub fn new(http: HttpClient, config: &ApiConfig) -> Self {
        Self { http, base: config.endpoint("tasks") }
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base, id)
    }
}

#[async_trait(?Send)]
impl RemoteStore for HttpTaskStore {
    type Entity = Task;

    async fn list(&self) -> SyncResult<Vec<Task>> {
        let request = self.http.inner().get(&self.base);
        let response = self.http.execute(request, "Failed to load tasks").await?;
        let tasks: Vec<Task> = HttpClient::decode(response, "Failed to load tasks").await?;
        debug!(count = tasks.len(), "tasks loaded");
        Ok(tasks)
    }

    async fn create(&self, draft: &TaskDraft) -> SyncResult<Task> {
        let request = self.http.inner().post(&self.base).json(draft);
        let response = self.http.execute(request, "Failed to create task").await?;
        HttpClient::decode(response, "Failed to create task").await
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> SyncResult<Task> {
        let request = self.http.inner().put(self.item_url(id)).json(patch);
        let response = self.http.execute(request, "Failed to update task").await?;
        HttpClient::decode(response, "Failed to update task").await
    }

    async fn delete(&self, id: &str) -> SyncResult<()> {
        let request = self.http.inner().delete(self.item_url(id));
        self.http.execute(request, "Failed to delete task").await?;
        Ok(())
    }
}
