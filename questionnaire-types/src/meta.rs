use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Publication state of a questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Published,
    Archived,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

/// What the questionnaire is used for.
///
/// Stored lowercase on the backend. Unrecognised kinds are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QuestionnaireKind {
    #[default]
    Survey,
    Poll,
    Assessment,
    Feedback,
    Other(String),
}

impl QuestionnaireKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Survey => "survey",
            Self::Poll => "poll",
            Self::Assessment => "assessment",
            Self::Feedback => "feedback",
            Self::Other(other) => other,
        }
    }

    /// Parse a stored kind, case-insensitively.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "survey" => Self::Survey,
            "poll" => Self::Poll,
            "assessment" => Self::Assessment,
            "feedback" => Self::Feedback,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl fmt::Display for QuestionnaireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for QuestionnaireKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QuestionnaireKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// Descriptive fields of a questionnaire.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuestionnaireMeta {
    pub title: String,
    pub description: String,
    /// Owning program (a UUID on the backend).
    pub program_id: Option<String>,
    pub status: Status,
    pub kind: QuestionnaireKind,
    /// Language codes offered to participants.
    pub languages: Vec<String>,
    /// Top-level keys this crate does not model, such as `scheduled_start`.
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SectionHeaderFormat {
    #[default]
    #[serde(rename = "numbered")]
    Numbered,
    #[serde(rename = "titleOnly")]
    TitleOnly,
}

/// Editor-level settings stored in the questionnaire's `settings` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub randomize_questions: bool,
    pub randomize_options: bool,
    pub show_progress_bar: bool,
    pub allow_save_continue: bool,
    pub show_header_in_participant_view: bool,
    pub custom_header_text: String,
    pub show_section_header: bool,
    pub section_header_format: SectionHeaderFormat,
    /// Keys written by other editors, such as `display_mode`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            randomize_questions: false,
            randomize_options: false,
            show_progress_bar: true,
            allow_save_continue: true,
            show_header_in_participant_view: true,
            custom_header_text: String::new(),
            show_section_header: true,
            section_header_format: SectionHeaderFormat::Numbered,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_editor_settings_keep_unknown_keys() {
        let settings: EditorSettings = serde_json::from_value(json!({
            "randomize_questions": true,
            "display_mode": "single_page",
        }))
        .unwrap();
        assert!(settings.randomize_questions);
        assert!(settings.show_progress_bar);
        assert_eq!(settings.extra.get("display_mode"), Some(&json!("single_page")));

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["display_mode"], json!("single_page"));
        assert_eq!(value["section_header_format"], json!("numbered"));
    }

    #[test]
    fn test_kind_parsing_is_case_insensitive() {
        assert_eq!(QuestionnaireKind::parse("Assessment"), QuestionnaireKind::Assessment);
        assert_eq!(
            QuestionnaireKind::parse("quiz"),
            QuestionnaireKind::Other("quiz".to_string())
        );
    }
}
