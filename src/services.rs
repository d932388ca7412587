//! Backend Services
//!
//! One set of clients per app, built from the resolved [`ApiConfig`], plus
//! reading user-picked files into memory for upload.

use study_sync::domain::MAX_DOCUMENT_BYTES;
use study_sync::{
    ApiConfig, AssistantClient, Attachment, AuthClient, HttpClient, HttpMaterialStore, HttpTaskStore, MaterialList,
    SyncError, SyncResult, TaskList,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Overrides baked in at build time, as a JSON object
const CONFIG_OVERRIDE: Option<&str> = option_env!("STUDY_CONFIG_JSON");

/// Defaults, optional JSON override, then same-origin paths resolved
pub fn load_config() -> ApiConfig {
    let config = match CONFIG_OVERRIDE {
        Some(raw) => ApiConfig::from_json(raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring STUDY_CONFIG_JSON");
            ApiConfig::default()
        }),
        None => ApiConfig::default(),
    };
    match web_sys::window().and_then(|w| w.location().origin().ok()) {
        Some(origin) => config.with_origin(&origin),
        None => config,
    }
}

#[derive(Clone)]
pub struct Services {
    pub tasks: TaskList,
    pub materials: MaterialList,
    pub auth: AuthClient,
    pub assistant: AssistantClient,
}

impl Services {
    pub fn new(config: &ApiConfig) -> Self {
        let http = HttpClient::new();
        Self {
            tasks: TaskList::new(HttpTaskStore::new(http.clone(), config)),
            materials: MaterialList::new(HttpMaterialStore::new(http.clone(), config)),
            auth: AuthClient::new(http.clone(), config),
            assistant: AssistantClient::new(http, config),
        }
    }
}

/// Read the first file chosen in an `<input type="file">`
pub async fn read_selected_file(ev: &web_sys::Event) -> SyncResult<Option<Attachment>> {
    let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
        return Ok(None);
    };
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };
    if file.size() > MAX_DOCUMENT_BYTES as f64 {
        return Err(SyncError::validation("File size must be less than 10MB"));
    }
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|_| SyncError::validation("Could not read the selected file"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    tracing::debug!(file = %file.name(), size = bytes.len(), "file read");
    Ok(Some(Attachment { filename: file.name(), bytes }))
}
