//! Task Entity
//!
//! A study task shown on the kanban board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::entity::Entity;
use super::status::{ApiStatus, DisplayStatus};
use crate::error::{SyncError, SyncResult};

/// A task as returned by `/tasks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "taskName", alias = "title")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(default)]
    pub status: ApiStatus,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn display_status(&self) -> DisplayStatus {
        self.status.display()
    }
}

/// Body of `POST /tasks`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDraft {
    #[serde(rename = "taskName")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subject: String,
    pub status: ApiStatus,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl TaskDraft {
    pub fn new(name: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            subject: subject.into(),
            status: ApiStatus::Pending,
            user_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() { None } else { Some(description) };
        self
    }

    pub fn with_status(mut self, status: ApiStatus) -> Self {
        self.status = status;
        self
    }

    pub fn owned_by(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Draft that recreates a task as it was, server fields aside
impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            description: task.description.clone(),
            subject: task.subject.clone(),
            status: task.status,
            user_id: task.user_id.clone(),
        }
    }
}

/// Body of `PUT /tasks/:id`; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(rename = "taskName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApiStatus>,
}

impl TaskPatch {
    pub fn status(status: ApiStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }

    pub fn rename(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Default::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.subject.is_none() && self.status.is_none()
    }
}

impl Entity for Task {
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn provisional(id: String, draft: &TaskDraft) -> Self {
        Task {
            id,
            user_id: draft.user_id.clone(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            subject: draft.subject.clone(),
            status: draft.status,
            created_at: Some(Utc::now()),
        }
    }

    fn apply(&mut self, patch: &TaskPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = if description.is_empty() { None } else { Some(description.clone()) };
        }
        if let Some(subject) = &patch.subject {
            self.subject = subject.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn validate_draft(draft: &TaskDraft) -> SyncResult<()> {
        if draft.name.trim().is_empty() {
            return Err(SyncError::validation("Task name is required"));
        }
        Ok(())
    }

    fn validate_patch(patch: &TaskPatch) -> SyncResult<()> {
        if patch.is_empty() {
            return Err(SyncError::validation("Nothing to update"));
        }
        if matches!(&patch.name, Some(name) if name.trim().is_empty()) {
            return Err(SyncError::validation("Task name is required"));
        }
        Ok(())
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
