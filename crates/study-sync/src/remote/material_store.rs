//! Study Material Store
//!
//! `/study-materials` accepts two body shapes on the same routes: multipart
//! when a document is being uploaded, JSON otherwise (including links).

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use tracing::debug;

use super::http::HttpClient;
use super::traits::RemoteStore;
use crate::config::ApiConfig;
use crate::domain::{document_mime, MaterialDraft, MaterialPatch, MaterialPayload, StudyMaterial};
use crate::error::SyncResult;

const DOCUMENT_FIELD: &str = "studyMaterialDocument";

/// Fields common to create and update bodies
struct Fields<'a> {
    id: Option<&'a str>,
    user_id: Option<&'a str>,
    name: Option<&'a str>,
    description: Option<&'a str>,
    payload: Option<&'a MaterialPayload>,
}

impl<'a> Fields<'a> {
    fn from_draft(draft: &'a MaterialDraft) -> Self {
        Self {
            id: None,
            user_id: draft.user_id.as_deref(),
            name: Some(&draft.name),
            description: Some(&draft.description),
            payload: Some(&draft.payload),
        }
    }

    fn from_patch(id: &'a str, patch: &'a MaterialPatch) -> Self {
        Self {
            id: Some(id),
            user_id: None,
            name: patch.name.as_deref(),
            description: patch.description.as_deref(),
            payload: patch.payload.as_ref(),
        }
    }

    fn has_upload(&self) -> bool {
        self.payload.is_some_and(MaterialPayload::has_upload)
    }

    fn text_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.id {
            pairs.push(("id", id.to_string()));
        }
        if let Some(user_id) = self.user_id {
            pairs.push(("userId", user_id.to_string()));
        }
        if let Some(name) = self.name {
            pairs.push(("materialName", name.to_string()));
        }
        if let Some(description) = self.description {
            pairs.push(("materialDescription", description.to_string()));
        }
        pairs
    }

    fn into_json(self) -> Value {
        let mut body = Map::new();
        for (key, value) in self.text_pairs() {
            body.insert(key.to_string(), Value::String(value));
        }
        let updating = self.id.is_some();
        match self.payload {
            Some(MaterialPayload::Document { href, .. }) => {
                let reference = href.clone().map(Value::String).unwrap_or(Value::Null);
                body.insert(DOCUMENT_FIELD.to_string(), reference);
            }
            Some(MaterialPayload::Link { url }) => {
                body.insert(DOCUMENT_FIELD.to_string(), Value::Null);
                body.insert("link".to_string(), Value::String(url.trim().to_string()));
            }
            Some(MaterialPayload::None) => {
                body.insert(DOCUMENT_FIELD.to_string(), Value::Null);
                if updating {
                    body.insert("link".to_string(), Value::Null);
                }
            }
            None => {}
        }
        Value::Object(body)
    }

    fn into_form(self) -> SyncResult<Form> {
        let mut form = Form::new();
        for (key, value) in self.text_pairs() {
            form = form.text(key, value);
        }
        if let Some(MaterialPayload::Document { filename, bytes, .. }) = self.payload {
            // An empty link reads back as no link, so the new file wins
            if self.id.is_some() {
                form = form.text("link", String::new());
            }
            let mime = document_mime(filename).unwrap_or("application/octet-stream");
            let part = Part::bytes(bytes.clone())
                .file_name(filename.clone())
                .mime_str(mime)?;
            form = form.part(DOCUMENT_FIELD, part);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone)]
pub struct HttpMaterialStore {
    http: HttpClient,
    base: String,
}

impl HttpMaterialStore {
    pub fn new(http: HttpClient, config: &ApiConfig) -> Self {
        Self { http, base: config.endpoint("study-materials") }
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base, id)
    }

    fn with_body(&self, request: reqwest::RequestBuilder, fields: Fields<'_>) -> SyncResult<reqwest::RequestBuilder> {
        if fields.has_upload() {
            debug!("sending material as multipart");
            Ok(request.multipart(fields.into_form()?))
        } else {
            Ok(request.json(&fields.into_json()))
        }
    }
}

#[async_trait(?Send)]
impl RemoteStore for HttpMaterialStore {
    type Entity = StudyMaterial;

    async fn list(&self) -> SyncResult<Vec<StudyMaterial>> {
        let request = self.http.inner().get(&self.base);
        let response = self.http.execute(request, "Failed to load study materials").await?;
        HttpClient::decode(response, "Failed to load study materials").await
    }

    async fn create(&self, draft: &MaterialDraft) -> SyncResult<StudyMaterial> {
        let request = self.with_body(self.http.inner().post(&self.base), Fields::from_draft(draft))?;
        let response = self.http.execute(request, "Failed to create material").await?;
        HttpClient::decode(response, "Failed to create material").await
    }

    async fn update(&self, id: &str, patch: &MaterialPatch) -> SyncResult<StudyMaterial> {
        let request = self.with_body(self.http.inner().put(self.item_url(id)), Fields::from_patch(id, patch))?;
        let response = self.http.execute(request, "Failed to update material").await?;
        HttpClient::decode(response, "Failed to update material").await
    }

    async fn delete(&self, id: &str) -> SyncResult<()> {
        let request = self.http.inner().delete(self.item_url(id));
        self.http.execute(request, "Failed to delete material").await?;
        Ok(())
    }
}
