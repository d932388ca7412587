//! Board Export and Import
//!
//! Tasks are written out as pretty-printed JSON. Import reads that shape
//! and the older per-subject layout (`{"subjects": [{"id", "tasks"}]}`),
//! and every entry becomes a new task created through the list controller.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::controller::OptimisticListController;
use crate::domain::{ApiStatus, Task, TaskDraft};
use crate::error::{SyncError, SyncResult};
use crate::remote::RemoteStore;

#[derive(Serialize)]
struct BoardExport<'a> {
    tasks: &'a [Task],
    #[serde(rename = "activeSubject", skip_serializing_if = "Option::is_none")]
    active_subject: Option<&'a str>,
}

/// Board contents as JSON text for the user to copy
pub fn export_board(tasks: &[Task], active_subject: Option<&str>) -> SyncResult<String> {
    serde_json::to_string_pretty(&BoardExport { tasks, active_subject })
        .map_err(|e| SyncError::validation(format!("Could not export tasks: {}", e)))
}

#[derive(Deserialize)]
struct ImportedTask {
    #[serde(rename = "taskName", alias = "title", alias = "name")]
    name: String,
    #[serde(default, alias = "note")]
    description: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    status: ApiStatus,
}

impl ImportedTask {
    fn into_draft(self, group: Option<&str>) -> TaskDraft {
        let subject = self
            .subject
            .filter(|s| !s.trim().is_empty())
            .or_else(|| group.map(str::to_string))
            .unwrap_or_default();
        let draft = TaskDraft::new(self.name, subject).with_status(self.status);
        match self.description {
            Some(description) => draft.with_description(description),
            None => draft,
        }
    }
}

#[derive(Deserialize)]
struct SubjectGroup {
    id: String,
    #[serde(default)]
    tasks: Vec<ImportedTask>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Board { tasks: Vec<ImportedTask> },
    Subjects { subjects: Vec<SubjectGroup> },
}

/// Parse exported JSON into drafts, in file order
pub fn parse_import(raw: &str) -> SyncResult<Vec<TaskDraft>> {
    let file: ImportFile =
        serde_json::from_str(raw).map_err(|_| SyncError::validation("Invalid JSON format"))?;
    let drafts = match file {
        ImportFile::Board { tasks } => tasks.into_iter().map(|t| t.into_draft(None)).collect(),
        ImportFile::Subjects { subjects } => subjects
            .into_iter()
            .flat_map(|group| {
                let subject = group.id;
                group.tasks.into_iter().map(move |t| t.into_draft(Some(&subject)))
            })
            .collect(),
    };
    Ok(drafts)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub failed: usize,
}

/// Create every draft, one after another. Failures are counted, not fatal.
pub async fn import_tasks<S>(controller: &OptimisticListController<S>, drafts: Vec<TaskDraft>) -> ImportSummary
where
    S: RemoteStore<Entity = Task>,
{
    let mut summary = ImportSummary::default();
    for draft in drafts {
        match controller.add(draft).await {
            Ok(_) => summary.added += 1,
            Err(err) => {
                warn!(error = %err, "skipping imported task");
                summary.failed += 1;
            }
        }
    }
    info!(added = summary.added, failed = summary.failed, "import finished");
    summary
}
