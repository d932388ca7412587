//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;
use study_sync::{
    ApiConfig, AssistantClient, AuthClient, GateDecision, MaterialList, Route, SessionGate, SyncError, SyncResult,
    TaskList, User,
};

use crate::services::Services;
use crate::storage::BrowserStorage;
use crate::store::{store_clear_session, DashboardStateStoreFields, DashboardStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Inline message shown above the page content
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u32,
    pub kind: NoticeKind,
    pub text: String,
}

/// App-wide signals and services provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Current page - read
    pub route: ReadSignal<Route>,
    /// Current page - write
    set_route: WriteSignal<Route>,
    pub notice: ReadSignal<Option<Notice>>,
    set_notice: WriteSignal<Option<Notice>>,
    services: StoredValue<Services, LocalStorage>,
    gate: StoredValue<SessionGate<BrowserStorage>>,
    config: StoredValue<ApiConfig>,
    store: DashboardStore,
}

impl AppContext {
    pub fn new(config: ApiConfig, store: DashboardStore) -> Self {
        let (route, set_route) = signal(Route::Login);
        let (notice, set_notice) = signal(None::<Notice>);
        let services = StoredValue::new_local(Services::new(&config));
        let gate = StoredValue::new(SessionGate::new(BrowserStorage, config.session_key.clone()));
        Self {
            route,
            set_route,
            notice,
            set_notice,
            services,
            gate,
            config: StoredValue::new(config),
            store,
        }
    }

    pub fn config(&self) -> ApiConfig {
        self.config.get_value()
    }

    // ---- services ----

    pub fn tasks(&self) -> TaskList {
        self.services.with_value(|s| s.tasks.clone())
    }

    pub fn materials(&self) -> MaterialList {
        self.services.with_value(|s| s.materials.clone())
    }

    pub fn auth(&self) -> AuthClient {
        self.services.with_value(|s| s.auth.clone())
    }

    pub fn assistant(&self) -> AssistantClient {
        self.services.with_value(|s| s.assistant.clone())
    }

    // ---- session ----

    /// Load the persisted session and land on the page in the address bar
    pub fn restore_session(&self) {
        let user = self.gate.try_update_value(|gate| gate.restore().cloned()).flatten();
        *self.store.user().write() = user;
        self.follow_location();
    }

    pub fn require_session(&self) -> GateDecision {
        self.gate.with_value(|gate| gate.require_session())
    }

    /// Owner id for new tasks and materials
    pub fn owner_id(&self) -> SyncResult<String> {
        self.gate.with_value(|gate| {
            gate.current()
                .map(|user| user.owner_id().unwrap_or_default().to_string())
        })
    }

    pub fn sign_in(&self, user: User) -> SyncResult<()> {
        let next = self
            .gate
            .try_update_value(|gate| gate.begin(user.clone()))
            .unwrap_or(Err(SyncError::Disposed))?;
        *self.store.user().write() = Some(user);
        self.navigate(next);
        Ok(())
    }

    pub fn sign_out(&self) {
        let next = self.gate.try_update_value(|gate| gate.end_session()).unwrap_or_default();
        store_clear_session(&self.store);
        self.set_notice.set(None);
        self.navigate(next);
    }

    // ---- navigation ----

    /// Go to a page, bouncing through the session gate
    pub fn navigate(&self, target: Route) {
        let route = self.gate.with_value(|gate| gate.route(target));
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            let _ = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(route.path()));
        }
        self.set_route.set(route);
    }

    /// Follow back/forward without pushing a new history entry
    pub fn follow_location(&self) {
        let target = current_path().map(|path| Route::from_path(&path)).unwrap_or_default();
        let route = self.gate.with_value(|gate| gate.route(target));
        if route != target {
            if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
                let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(route.path()));
            }
        }
        self.set_route.set(route);
    }

    // ---- notices ----

    pub fn notify_success(&self, text: impl Into<String>) {
        self.show_notice(NoticeKind::Success, text.into());
    }

    pub fn notify_error(&self, err: &SyncError) {
        self.show_notice(NoticeKind::Error, err.to_string());
    }

    pub fn clear_notice(&self, id: u32) {
        if self.notice.with_untracked(|n| n.as_ref().is_some_and(|n| n.id == id)) {
            self.set_notice.set(None);
        }
    }

    fn show_notice(&self, kind: NoticeKind, text: String) {
        let id = self.notice.with_untracked(|n| n.as_ref().map_or(0, |n| n.id)) + 1;
        self.set_notice.set(Some(Notice { id, kind, text }));
    }
}

fn current_path() -> Option<String> {
    web_sys::window()?.location().pathname().ok()
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
