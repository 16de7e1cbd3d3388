use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use questionnaire_types::RemoteId;
use questionnaire_wire::{QuestionnairePayload, QuestionnaireStore, StoreError};
use reqwest::{Client, RequestBuilder, Response};

use crate::response::classify_response;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for setting up an [`HttpStore`].
#[derive(Debug, thiserror::Error)]
pub enum HttpStoreError {
    #[error("Invalid base URL '{0}': expected http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A [`QuestionnaireStore`] talking to the REST API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStore {
    /// Create a store for the API rooted at `base_url`, e.g.
    /// `https://surveys.example.org/api`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpStoreError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, HttpStoreError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(HttpStoreError::InvalidBaseUrl(base_url));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("questionnaire-http/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Send `token` as a bearer token with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of one questionnaire resource.
    pub fn questionnaire_url(&self, id: &RemoteId) -> String {
        format!("{}/questionnaires/{id}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(reqwest::header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read(id: &RemoteId, response: Response) -> Result<QuestionnairePayload, StoreError> {
        let status = response.status();
        debug!("questionnaire {id} response status: {status}");
        let body = response.text().await.map_err(transport)?;
        classify_response(id, status.as_u16(), &body)
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(Box::new(err))
}

#[async_trait]
impl QuestionnaireStore for HttpStore {
    async fn fetch(&self, id: &RemoteId) -> Result<QuestionnairePayload, StoreError> {
        let url = self.questionnaire_url(id);
        debug!("GET {url}");
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(transport)?;
        Self::read(id, response).await
    }

    async fn save(
        &self,
        id: &RemoteId,
        payload: &QuestionnairePayload,
    ) -> Result<QuestionnairePayload, StoreError> {
        let url = self.questionnaire_url(id);
        debug!("PUT {url}");
        let response = self
            .authorized(self.client.put(&url))
            .json(payload)
            .send()
            .await
            .map_err(transport)?;
        let stored = Self::read(id, response).await?;
        info!("questionnaire {id} saved");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let store = HttpStore::new("https://surveys.example.org/api/").unwrap();
        assert_eq!(store.base_url(), "https://surveys.example.org/api");
        assert_eq!(
            store.questionnaire_url(&RemoteId::from("9b1f")),
            "https://surveys.example.org/api/questionnaires/9b1f"
        );
        assert_eq!(
            store.questionnaire_url(&RemoteId::Int(4)),
            "https://surveys.example.org/api/questionnaires/4"
        );
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(matches!(
            HttpStore::new("surveys.example.org"),
            Err(HttpStoreError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let store = HttpStore::with_timeout("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        assert!(matches!(
            store.fetch(&RemoteId::Int(1)).await,
            Err(StoreError::Transport(_))
        ));
    }
}
