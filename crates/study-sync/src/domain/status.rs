//! Task Status Vocabulary
//!
//! The backend has emitted several spellings over time (`todo`, `pending`,
//! `in progress`, `in-progress`). Everything is canonicalized at the edge:
//! [`ApiStatus`] is what goes over the wire, [`DisplayStatus`] is what the
//! board columns show.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Status as stored by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Status as shown in the kanban columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    #[default]
    Pending,
    Ongoing,
    Completed,
}

impl ApiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiStatus::Pending => "pending",
            ApiStatus::InProgress => "in-progress",
            ApiStatus::Completed => "completed",
        }
    }

    /// Parse any known spelling; unknown values fall back to pending
    pub fn parse(raw: &str) -> Self {
        StatusMapper::to_api(StatusMapper::to_display(raw))
    }

    pub fn display(&self) -> DisplayStatus {
        match self {
            ApiStatus::Pending => DisplayStatus::Pending,
            ApiStatus::InProgress => DisplayStatus::Ongoing,
            ApiStatus::Completed => DisplayStatus::Completed,
        }
    }
}

impl Serialize for ApiStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ApiStatus::parse(&raw))
    }
}

impl DisplayStatus {
    /// Column order on the board
    pub const ALL: [DisplayStatus; 3] = [
        DisplayStatus::Pending,
        DisplayStatus::Ongoing,
        DisplayStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Pending => "pending",
            DisplayStatus::Ongoing => "ongoing",
            DisplayStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayStatus::Pending => "Pending",
            DisplayStatus::Ongoing => "Ongoing",
            DisplayStatus::Completed => "Completed",
        }
    }

    /// One column to the right, stopping at the last
    pub fn next(&self) -> Self {
        match self {
            DisplayStatus::Pending => DisplayStatus::Ongoing,
            DisplayStatus::Ongoing | DisplayStatus::Completed => DisplayStatus::Completed,
        }
    }

    /// One column to the left, stopping at the first
    pub fn previous(&self) -> Self {
        match self {
            DisplayStatus::Pending | DisplayStatus::Ongoing => DisplayStatus::Pending,
            DisplayStatus::Completed => DisplayStatus::Ongoing,
        }
    }

    /// Wrapping step used by the Enter key
    pub fn cycle(&self) -> Self {
        match self {
            DisplayStatus::Pending => DisplayStatus::Ongoing,
            DisplayStatus::Ongoing => DisplayStatus::Completed,
            DisplayStatus::Completed => DisplayStatus::Pending,
        }
    }
}

/// Pure mapping between backend and display vocabularies
pub struct StatusMapper;

impl StatusMapper {
    /// Total: every input maps to one of the three columns
    pub fn to_display(api_status: &str) -> DisplayStatus {
        let normalized = api_status.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "in-progress" | "inprogress" | "ongoing" | "doing" => DisplayStatus::Ongoing,
            "completed" | "complete" | "done" => DisplayStatus::Completed,
            _ => DisplayStatus::Pending,
        }
    }

    pub fn to_api(display: DisplayStatus) -> ApiStatus {
        match display {
            DisplayStatus::Pending => ApiStatus::Pending,
            DisplayStatus::Ongoing => ApiStatus::InProgress,
            DisplayStatus::Completed => ApiStatus::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_api() {
        for status in DisplayStatus::ALL {
            assert_eq!(StatusMapper::to_display(StatusMapper::to_api(status).as_str()), status);
        }
    }

    #[test]
    fn test_legacy_synonyms() {
        assert_eq!(StatusMapper::to_display("todo"), StatusMapper::to_display("pending"));
        assert_eq!(StatusMapper::to_display("in-progress"), StatusMapper::to_display("ongoing"));
        assert_eq!(StatusMapper::to_display("in progress"), DisplayStatus::Ongoing);
        assert_eq!(StatusMapper::to_display(" In_Progress "), DisplayStatus::Ongoing);
        assert_eq!(StatusMapper::to_display("COMPLETED"), DisplayStatus::Completed);
    }

    #[test]
    fn test_unknown_maps_to_pending() {
        assert_eq!(StatusMapper::to_display(""), DisplayStatus::Pending);
        assert_eq!(StatusMapper::to_display("archived"), DisplayStatus::Pending);
    }

    #[test]
    fn test_api_status_decodes_legacy_values() {
        let parsed: Vec<ApiStatus> =
            serde_json::from_str(r#"["todo", "in progress", "ongoing", "completed"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![ApiStatus::Pending, ApiStatus::InProgress, ApiStatus::InProgress, ApiStatus::Completed]
        );
        assert_eq!(serde_json::to_string(&ApiStatus::InProgress).unwrap(), r#""in-progress""#);
    }

    #[test]
    fn test_keyboard_steps() {
        assert_eq!(DisplayStatus::Pending.next(), DisplayStatus::Ongoing);
        assert_eq!(DisplayStatus::Completed.next(), DisplayStatus::Completed);
        assert_eq!(DisplayStatus::Pending.previous(), DisplayStatus::Pending);
        assert_eq!(DisplayStatus::Completed.cycle(), DisplayStatus::Pending);
    }
}
