//! Mapping between the editor's type tags and the backend's stored vocabulary.

use questionnaire_types::QuestionType;

/// Type tags the backend accepts on save.
pub const STORED_TYPES: &[&str] = &[
    "text",
    "textarea",
    "number",
    "email",
    "phone",
    "url",
    "radio",
    "checkbox",
    "select",
    "multiselect",
    "rating",
    "scale",
    "date",
    "time",
    "datetime",
    "file",
    "yesno",
    "matrix",
    "information",
    "slider_scale",
    "dial_gauge",
    "likert_visual",
    "nps",
    "star_rating",
    "drag_and_drop",
    "sct_likert",
    "video",
    "comment",
    "percentage_allocation",
];

/// The tag stored for a question type.
pub fn to_stored(ty: QuestionType) -> &'static str {
    match ty {
        QuestionType::MultipleChoice => "radio",
        QuestionType::MultiSelect => "multiselect",
        QuestionType::Slider => "scale",
        other => other.as_str(),
    }
}

/// The question type for a stored tag.
///
/// `checkbox` is read as multi-select. Internal tags such as `mcq` are
/// accepted too.
pub fn from_stored(tag: &str) -> Option<QuestionType> {
    match tag {
        "radio" => Some(QuestionType::MultipleChoice),
        "multiselect" | "checkbox" => Some(QuestionType::MultiSelect),
        "scale" => Some(QuestionType::Slider),
        other => other.parse().ok(),
    }
}
