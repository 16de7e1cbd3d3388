/// Error type for turning a stored payload back into a questionnaire.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The body is not JSON, or not shaped like a questionnaire.
    #[error("Malformed questionnaire payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A question carries a type tag this builder does not support.
    #[error("Unknown question type '{tag}' at {path}")]
    UnknownQuestionType { path: String, tag: String },

    /// A settings object could not be read as the settings of its type.
    #[error("Invalid settings at {path}: {source}")]
    InvalidSettings {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub(crate) fn invalid_settings(path: &str) -> impl FnOnce(serde_json::Error) -> Self + '_ {
        move |source| Self::InvalidSettings {
            path: path.to_string(),
            source,
        }
    }
}
