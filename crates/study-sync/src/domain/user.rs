//! User Records
//!
//! The backend's user object is only partly known; unknown fields are kept
//! so the persisted session round-trips verbatim.

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Authenticated user as returned by `/auth/login` and `/auth/register`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Student")
    }

    /// Owner id to stamp on new tasks and materials
    pub fn owner_id(&self) -> Option<&str> {
        if self.id.is_empty() { None } else { Some(&self.id) }
    }
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> SyncResult<()> {
        if self.email.trim().is_empty() {
            return Err(SyncError::validation("Email is required"));
        }
        if self.password.is_empty() {
            return Err(SyncError::validation("Password is required"));
        }
        Ok(())
    }
}

/// Sign-up form; `confirm_password` never leaves the client
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Registration {
    pub name: String,
    #[serde(rename = "id")]
    pub student_id: String,
    pub department: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl Registration {
    pub fn validate(&self) -> SyncResult<()> {
        let required = [
            (&self.name, "Full name"),
            (&self.student_id, "Student / Employee ID"),
            (&self.department, "Department"),
            (&self.email, "Email"),
        ];
        for (value, label) in required {
            if value.trim().is_empty() {
                return Err(SyncError::validation(format!("{} is required", label)));
            }
        }
        if self.password.is_empty() {
            return Err(SyncError::validation("Password is required"));
        }
        if self.password != self.confirm_password {
            return Err(SyncError::validation("Passwords do not match"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_keeps_unknown_fields() {
        let raw = r#"{"_id": "u1", "name": "Asha", "email": "a@x.test", "department": "CSE"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.display_name(), "Asha");
        assert_eq!(user.extra.get("department").and_then(|v| v.as_str()), Some("CSE"));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["department"], "CSE");
        assert_eq!(back["_id"], "u1");
    }

    #[test]
    fn test_registration_password_mismatch() {
        let form = Registration {
            name: "Asha".into(),
            student_id: "S-1".into(),
            department: "CSE".into(),
            email: "a@x.test".into(),
            password: "secret".into(),
            confirm_password: "secrets".into(),
        };
        assert_eq!(form.validate(), Err(SyncError::validation("Passwords do not match")));
    }

    #[test]
    fn test_registration_body_omits_confirmation() {
        let form = Registration { password: "p".into(), confirm_password: "p".into(), ..Default::default() };
        let body = serde_json::to_value(&form).unwrap();
        assert!(body.get("confirm_password").is_none());
        assert!(body.get("id").is_some());
    }
}
