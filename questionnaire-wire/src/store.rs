//! The persistence contract the builder saves through.

use async_trait::async_trait;
use questionnaire_types::{RemoteId, ValidationErrors};

use crate::payload::QuestionnairePayload;

/// Errors reported by a [`QuestionnaireStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Questionnaire {0} not found")]
    NotFound(RemoteId),

    /// The store rejected the payload field by field.
    #[error("{message} ({errors})")]
    Validation {
        message: String,
        errors: ValidationErrors,
    },

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body could not be read as a questionnaire.
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Where questionnaires are fetched from and saved to.
///
/// `save` replaces the whole stored questionnaire with `payload` and returns
/// what the store now holds.
#[async_trait]
pub trait QuestionnaireStore: Send + Sync {
    async fn fetch(&self, id: &RemoteId) -> Result<QuestionnairePayload, StoreError>;

    async fn save(
        &self,
        id: &RemoteId,
        payload: &QuestionnairePayload,
    ) -> Result<QuestionnairePayload, StoreError>;
}
