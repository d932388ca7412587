//! Study Assistant Client
//!
//! Posts a question (and optionally a file) to the assistant endpoint and
//! returns the generated answer text.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::http::HttpClient;
use crate::config::ApiConfig;
use crate::error::{SyncError, SyncResult};

const ASK_FAILURE: &str = "Error: Could not get response from AI.";

/// A file attached to a question
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Deserialize)]
struct AnswerBody {
    #[serde(default)]
    answer: String,
}

#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: HttpClient,
    url: String,
}

impl AssistantClient {
    pub fn new(http: HttpClient, config: &ApiConfig) -> Self {
        Self { http, url: config.assistant_url.clone() }
    }

    pub async fn ask(&self, question: &str, attachment: Option<Attachment>) -> SyncResult<String> {
        if question.trim().is_empty() && attachment.is_none() {
            return Err(SyncError::validation("Please enter a question or upload a file."));
        }

        let mut form = Form::new().text("question", question.trim().to_string());
        if let Some(file) = attachment {
            form = form.part("file", Part::bytes(file.bytes).file_name(file.filename));
        }

        let request = self.http.inner().post(&self.url).multipart(form);
        let response = self.http.execute(request, ASK_FAILURE).await?;
        let body: AnswerBody = HttpClient::decode(response, ASK_FAILURE).await?;
        if body.answer.trim().is_empty() {
            return Err(SyncError::transport(ASK_FAILURE));
        }
        Ok(body.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_question_without_file_is_rejected() {
        let client = AssistantClient::new(HttpClient::new(), &ApiConfig::default());
        let err = client.ask("   ", None).await.unwrap_err();
        assert_eq!(err, SyncError::validation("Please enter a question or upload a file."));
    }
}
