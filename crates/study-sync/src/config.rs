//! API Configuration
//!
//! Browser builds have no process environment, so defaults are baked in at
//! compile time through `option_env!` and can be overridden with a JSON blob.

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_ASSISTANT_URL: &str = "/api/askGemini";
const DEFAULT_SESSION_KEY: &str = "user";
const DEFAULT_NOTICE_MS: u32 = 3_000;
const DEFAULT_LOG_CAPACITY: usize = 500;

/// Endpoints and client-side tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    /// Base for `/tasks`, `/study-materials` and `/auth/*`
    pub api_base_url: String,
    /// Full URL (or same-origin path) of the assistant endpoint
    pub assistant_url: String,
    /// Local-storage key holding the session record
    pub session_key: String,
    /// How long inline notices stay visible
    pub notice_ms: u32,
    /// Lines kept by the in-memory log buffer
    pub log_capacity: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("STUDY_API_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            assistant_url: option_env!("STUDY_ASSISTANT_URL")
                .unwrap_or(DEFAULT_ASSISTANT_URL)
                .to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            notice_ms: DEFAULT_NOTICE_MS,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl ApiConfig {
    /// Override defaults from a (possibly partial) JSON object
    pub fn from_json(raw: &str) -> SyncResult<Self> {
        let config: ApiConfig = serde_json::from_str(raw)
            .map_err(|e| SyncError::validation(format!("Invalid configuration: {}", e)))?;
        Ok(config.normalized())
    }

    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base_url = base.into();
        self.normalized()
    }

    /// Resolve a same-origin assistant path against the page origin
    pub fn with_origin(mut self, origin: &str) -> Self {
        if self.assistant_url.starts_with('/') {
            self.assistant_url = format!("{}{}", origin.trim_end_matches('/'), self.assistant_url);
        }
        self
    }

    /// Join a resource path onto the API base
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    /// Absolute URL for a stored upload reference such as `uploads/notes.pdf`
    pub fn asset_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_string();
        }
        let origin = match url::Url::parse(&self.api_base_url) {
            Ok(base) => base.origin().ascii_serialization(),
            Err(_) => self.api_base_url.clone(),
        };
        format!("{}/{}", origin, href.trim_start_matches('/'))
    }

    fn normalized(mut self) -> Self {
        while self.api_base_url.ends_with('/') {
            self.api_base_url.pop();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = ApiConfig::default().with_base_url("http://example.test/api/");
        assert_eq!(config.endpoint("/tasks"), "http://example.test/api/tasks");
        assert_eq!(config.endpoint("auth/login"), "http://example.test/api/auth/login");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ApiConfig::from_json(r#"{"apiBaseUrl": "https://api.school.test/"}"#).unwrap();
        assert_eq!(config.api_base_url, "https://api.school.test");
        assert_eq!(config.session_key, "user");
        assert_eq!(config.notice_ms, 3_000);
    }

    #[test]
    fn test_relative_assistant_url_resolves_against_origin() {
        let config = ApiConfig::default().with_origin("http://localhost:3000/");
        assert_eq!(config.assistant_url, "http://localhost:3000/api/askGemini");

        let absolute = ApiConfig { assistant_url: "https://ai.test/ask".into(), ..ApiConfig::default() };
        assert_eq!(absolute.with_origin("http://localhost:3000").assistant_url, "https://ai.test/ask");
    }

    #[test]
    fn test_asset_url_uses_api_origin() {
        let config = ApiConfig::default().with_base_url("http://localhost:5000/api");
        assert_eq!(config.asset_url("uploads/notes.pdf"), "http://localhost:5000/uploads/notes.pdf");
        assert_eq!(config.asset_url("https://cdn.test/a.pdf"), "https://cdn.test/a.pdf");
    }

    #[test]
    fn test_invalid_json_is_validation_error() {
        let err = ApiConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, SyncError::Validation(_)));
    }
}
