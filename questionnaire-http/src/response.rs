use questionnaire_types::{RemoteId, ValidationErrors};
use questionnaire_wire::{QuestionnairePayload, StoreError, unwrap_data};
use serde::Deserialize;
use serde_json::Value;

/// Error body the backend sends with 4xx and 5xx responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    /// Exception text on 500 responses.
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: ValidationErrors,
}

/// Turn a response for questionnaire `id` into a payload or a [`StoreError`].
///
/// Successful bodies may be bare or wrapped in `{"data": ...}`.
pub fn classify_response(
    id: &RemoteId,
    status: u16,
    body: &str,
) -> Result<QuestionnairePayload, StoreError> {
    if (200..300).contains(&status) {
        let value: Value = serde_json::from_str(body)?;
        return Ok(serde_json::from_value(unwrap_data(value))?);
    }

    let error: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    match status {
        404 => Err(StoreError::NotFound(id.clone())),
        422 => Err(StoreError::Validation {
            message: error
                .message
                .unwrap_or_else(|| "The given data was invalid.".to_string()),
            errors: error.errors,
        }),
        _ => {
            let message = match (error.message, error.error) {
                (Some(message), Some(detail)) => format!("{message}: {detail}"),
                (Some(message), None) | (None, Some(message)) => message,
                (None, None) => body.chars().take(200).collect(),
            };
            Err(StoreError::Server { status, message })
        }
    }
}
