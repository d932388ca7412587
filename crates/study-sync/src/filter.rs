//! Task and material filtering

use crate::domain::{DisplayStatus, StudyMaterial, Task};

/// Search box, status dropdown and subject tab, combined
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub search: String,
    pub status: Option<DisplayStatus>,
    pub subject: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.display_status() != status {
                return false;
            }
        }
        if let Some(subject) = &self.subject {
            if !task.subject.trim().eq_ignore_ascii_case(subject.trim()) {
                return false;
            }
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || task.name.to_lowercase().contains(&needle)
            || task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

/// Per-column totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub ongoing: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            match task.display_status() {
                DisplayStatus::Pending => counts.pending += 1,
                DisplayStatus::Ongoing => counts.ongoing += 1,
                DisplayStatus::Completed => counts.completed += 1,
            }
        }
        counts
    }

    pub fn get(&self, status: DisplayStatus) -> usize {
        match status {
            DisplayStatus::Pending => self.pending,
            DisplayStatus::Ongoing => self.ongoing,
            DisplayStatus::Completed => self.completed,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.ongoing + self.completed
    }
}

/// Distinct non-empty subjects, first-seen order, case-insensitive
pub fn subjects(tasks: &[Task]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for task in tasks {
        let subject = task.subject.trim();
        if subject.is_empty() || seen.iter().any(|s| s.eq_ignore_ascii_case(subject)) {
            continue;
        }
        seen.push(subject.to_string());
    }
    seen
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialFilter {
    pub search: String,
}

impl MaterialFilter {
    pub fn matches(&self, material: &StudyMaterial) -> bool {
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || material.name.to_lowercase().contains(&needle)
            || material.description.to_lowercase().contains(&needle)
    }

    pub fn apply<'a>(&self, materials: &'a [StudyMaterial]) -> Vec<&'a StudyMaterial> {
        materials.iter().filter(|m| self.matches(m)).collect()
    }
}
