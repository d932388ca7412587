//! Session Gate
//!
//! Owns the signed-in user for one app instance and keeps it mirrored in a
//! key/value backend (browser local storage in production).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{info, warn};

use crate::domain::User;
use crate::error::{SyncError, SyncResult};

/// Pages of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Login,
    Register,
    Dashboard,
    Tasks,
    Materials,
    Assistant,
}

impl Route {
    pub const NAVIGATION: [Route; 4] = [Route::Dashboard, Route::Tasks, Route::Materials, Route::Assistant];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Tasks => "/tasks",
            Route::Materials => "/study-materials",
            Route::Assistant => "/ai-assistant",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Register => "Register",
            Route::Dashboard => "Dashboard",
            Route::Tasks => "Tasks",
            Route::Materials => "Study Materials",
            Route::Assistant => "AI Assistant",
        }
    }

    /// Unknown paths land on the dashboard (which itself requires a session)
    pub fn from_path(path: &str) -> Route {
        match path.trim_end_matches('/') {
            "" | "/" | "/login" => Route::Login,
            "/register" => Route::Register,
            "/tasks" => Route::Tasks,
            "/study-materials" => Route::Materials,
            "/ai-assistant" => Route::Assistant,
            _ => Route::Dashboard,
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

/// Where the persisted session record lives
pub trait SessionStorage {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str) -> SyncResult<()>;
    fn remove(&self, key: &str);
}

/// Shared in-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage(Rc<RefCell<HashMap<String, String>>>);

impl MemoryStorage {
    pub fn contains(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) -> SyncResult<()> {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.0.borrow_mut().remove(key);
    }
}

/// Result of guarding a protected page
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Render(User),
    Redirect(Route),
}

pub struct SessionGate<S: SessionStorage> {
    storage: S,
    key: String,
    user: Option<User>,
}

impl<S: SessionStorage> SessionGate<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self { storage, key: key.into(), user: None }
    }

    /// Load the persisted session; an unreadable record is dropped
    pub fn restore(&mut self) -> Option<&User> {
        self.user = match self.storage.load(&self.key) {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(error = %err, "discarding corrupt session record");
                    self.storage.remove(&self.key);
                    None
                }
            },
            None => None,
        };
        self.user.as_ref()
    }

    pub fn require_session(&self) -> GateDecision {
        match &self.user {
            Some(user) => GateDecision::Render(user.clone()),
            None => GateDecision::Redirect(Route::Login),
        }
    }

    /// Gate a navigation target
    pub fn route(&self, target: Route) -> Route {
        match (target.requires_session(), &self.user) {
            (true, None) => Route::Login,
            (false, Some(_)) => Route::Dashboard,
            _ => target,
        }
    }

    pub fn current(&self) -> SyncResult<&User> {
        self.user.as_ref().ok_or(SyncError::SessionMissing)
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Persist a fresh sign-in
    pub fn begin(&mut self, user: User) -> SyncResult<Route> {
        let raw = serde_json::to_string(&user)
            .map_err(|e| SyncError::validation(format!("Could not save session: {}", e)))?;
        self.storage.save(&self.key, &raw)?;
        info!(user = %user.id, "session started");
        self.user = Some(user);
        Ok(Route::Dashboard)
    }

    pub fn end_session(&mut self) -> Route {
        if let Some(user) = self.user.take() {
            info!(user = %user.id, "session ended");
        }
        self.storage.remove(&self.key);
        Route::Login
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        serde_json::from_value(serde_json::json!({ "_id": id, "name": "Asha", "role": "student" })).unwrap()
    }

    #[test]
    fn test_no_session_redirects_to_login() {
        let mut gate = SessionGate::new(MemoryStorage::default(), "user");
        assert!(gate.restore().is_none());
        assert_eq!(gate.require_session(), GateDecision::Redirect(Route::Login));
        assert_eq!(gate.current(), Err(SyncError::SessionMissing));
        assert_eq!(gate.route(Route::Tasks), Route::Login);
    }

    #[test]
    fn test_begin_persists_and_restores() {
        let storage = MemoryStorage::default();
        let mut gate = SessionGate::new(storage.clone(), "user");
        assert_eq!(gate.begin(user("u1")).unwrap(), Route::Dashboard);
        assert_eq!(gate.route(Route::Login), Route::Dashboard);

        let mut reopened = SessionGate::new(storage, "user");
        let restored = reopened.restore().cloned().unwrap();
        assert_eq!(restored, user("u1"));
        assert_eq!(restored.extra.get("role").and_then(|v| v.as_str()), Some("student"));
        assert_eq!(reopened.require_session(), GateDecision::Render(restored));
    }

    #[test]
    fn test_end_session_clears_storage() {
        let storage = MemoryStorage::default();
        let mut gate = SessionGate::new(storage.clone(), "user");
        gate.begin(user("u1")).unwrap();

        assert_eq!(gate.end_session(), Route::Login);
        assert!(!gate.is_signed_in());
        assert!(!storage.contains("user"));
    }

    #[test]
    fn test_corrupt_record_is_discarded() {
        let storage = MemoryStorage::default();
        storage.save("user", "{not json").unwrap();

        let mut gate = SessionGate::new(storage.clone(), "user");
        assert!(gate.restore().is_none());
        assert!(!storage.contains("user"));
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::from_path("/study-materials"), Route::Materials);
        assert_eq!(Route::from_path("/"), Route::Login);
        assert_eq!(Route::from_path("/nowhere"), Route::Dashboard);
        for route in Route::NAVIGATION {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }
}
