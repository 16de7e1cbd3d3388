use std::fmt;
use std::str::FromStr;

/// The closed set of question types the builder knows about.
///
/// A question's type is fixed at creation; changing it means deleting the
/// question and adding a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QuestionType {
    MultipleChoice,
    MultiSelect,
    Text,
    Slider,
    Rating,
    Matrix,
    Information,
    SliderScale,
    DialGauge,
    LikertVisual,
    Nps,
    StarRating,
    DragAndDrop,
    SctLikert,
}

impl QuestionType {
    /// Every type, in the order the builder offers them.
    pub const ALL: [QuestionType; 14] = [
        Self::MultipleChoice,
        Self::MultiSelect,
        Self::Text,
        Self::Slider,
        Self::Rating,
        Self::Matrix,
        Self::Information,
        Self::SliderScale,
        Self::DialGauge,
        Self::LikertVisual,
        Self::Nps,
        Self::StarRating,
        Self::DragAndDrop,
        Self::SctLikert,
    ];

    /// The internal tag used by the editor.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MultipleChoice => "mcq",
            Self::MultiSelect => "multi",
            Self::Text => "text",
            Self::Slider => "slider",
            Self::Rating => "rating",
            Self::Matrix => "matrix",
            Self::Information => "information",
            Self::SliderScale => "slider_scale",
            Self::DialGauge => "dial_gauge",
            Self::LikertVisual => "likert_visual",
            Self::Nps => "nps",
            Self::StarRating => "star_rating",
            Self::DragAndDrop => "drag_and_drop",
            Self::SctLikert => "sct_likert",
        }
    }

    /// Human readable name, used for default prompts and menus.
    pub fn label(self) -> &'static str {
        match self {
            Self::MultipleChoice => "Multiple Choice",
            Self::MultiSelect => "Multi Select",
            Self::Text => "Text",
            Self::Slider => "Slider",
            Self::Rating => "Rating",
            Self::Matrix => "Matrix",
            Self::Information => "Information Block",
            Self::SliderScale => "Slider Scale",
            Self::DialGauge => "Dial Gauge",
            Self::LikertVisual => "Visual Likert",
            Self::Nps => "Net Promoter Score",
            Self::StarRating => "Star Rating",
            Self::DragAndDrop => "Drag and Drop",
            Self::SctLikert => "SCT Likert",
        }
    }

    /// Whether questions of this type carry an editable option list.
    pub fn has_options(self) -> bool {
        matches!(
            self,
            Self::MultipleChoice | Self::MultiSelect | Self::SctLikert
        )
    }

    /// Whether questions of this type can be scored with correct answers.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::MultipleChoice | Self::MultiSelect)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown internal type tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown question type: {0}")]
pub struct UnknownQuestionType(pub String);

impl FromStr for QuestionType {
    type Err = UnknownQuestionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| UnknownQuestionType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_parse_back() {
        for ty in QuestionType::ALL {
            assert_eq!(ty.as_str().parse::<QuestionType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_unknown_tag() {
        let err = "radio".parse::<QuestionType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown question type: radio");
    }
}
