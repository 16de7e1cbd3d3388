use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::settings::{
    DialGaugeSettings, DragAndDropSettings, LikertVisualSettings, NpsSettings,
    SctLikertSettings, SliderScaleSettings, StarRatingSettings, agreement_labels,
};
use crate::{ConditionalLogic, QuestionId, QuestionType, RemoteId};

/// Default label prompt for a newly added information block.
pub const INFORMATION_BLOCK_TITLE: &str = "Information Block";

/// A single question within a section.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub(crate) id: QuestionId,
    pub(crate) remote_id: Option<RemoteId>,
    pub(crate) prompt: String,
    pub(crate) description: String,
    pub(crate) required: bool,
    pub(crate) image_url: Option<String>,
    pub(crate) translations: BTreeMap<String, Translation>,
    pub(crate) conditional_logic: Option<ConditionalLogic>,
    pub(crate) kind: QuestionKind,
    pub(crate) extra: Map<String, Value>,
    pub(crate) attributes: Map<String, Value>,
}

impl Question {
    /// Create a question of the given kind with a fresh id.
    pub fn new(prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: QuestionId::fresh(),
            remote_id: None,
            prompt: prompt.into(),
            description: String::new(),
            required: false,
            image_url: None,
            translations: BTreeMap::new(),
            conditional_logic: None,
            kind,
            extra: Map::new(),
            attributes: Map::new(),
        }
    }

    /// Create a question seeded with the builder defaults for `ty`.
    pub fn with_defaults(ty: QuestionType) -> Self {
        let prompt = match ty {
            QuestionType::Information => INFORMATION_BLOCK_TITLE.to_string(),
            other => format!("New {} question", other.as_str()),
        };
        Self::new(prompt, QuestionKind::default_for(ty))
    }

    pub fn with_remote_id(mut self, remote_id: Option<RemoteId>) -> Self {
        self.remote_id = remote_id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn with_translations(mut self, translations: BTreeMap<String, Translation>) -> Self {
        self.translations = translations;
        self
    }

    pub fn with_conditional_logic(mut self, logic: Option<ConditionalLogic>) -> Self {
        self.conditional_logic = logic.map(ConditionalLogic::normalized);
        self
    }

    /// Attach settings keys this crate does not model.
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Attach record-level keys this crate does not model, such as
    /// `is_comment_enabled` or `validations`.
    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn remote_id(&self) -> Option<&RemoteId> {
        self.remote_id.as_ref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Help text shown under the prompt. Information blocks derive theirs
    /// from the body instead.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn translations(&self) -> &BTreeMap<String, Translation> {
        &self.translations
    }

    pub fn conditional_logic(&self) -> Option<&ConditionalLogic> {
        self.conditional_logic.as_ref()
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Settings keys carried through untouched.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Record-level keys carried through untouched.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    /// Copy of this question under a fresh id, not yet known to the backend.
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: QuestionId::fresh(),
            remote_id: None,
            ..self.clone()
        }
    }
}

/// Per-language override of a question's visible text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Type-specific payload of a question.
///
/// The variant determines the question's type, which cannot change after
/// creation.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Pick exactly one option.
    MultipleChoice(ChoiceQuestion),
    /// Pick any number of options.
    MultiSelect(ChoiceQuestion),
    Text(TextQuestion),
    Slider(SliderQuestion),
    Rating(RatingQuestion),
    Matrix(MatrixQuestion),
    /// Rich text shown to participants; collects no answer.
    Information(InformationBlock),
    SliderScale(SliderScaleSettings),
    DialGauge(DialGaugeSettings),
    LikertVisual(LikertVisualSettings),
    Nps(NpsSettings),
    StarRating(StarRatingSettings),
    DragAndDrop(DragAndDropSettings),
    SctLikert(SctLikertQuestion),
}

impl QuestionKind {
    /// The payload a freshly added question of type `ty` starts with.
    pub fn default_for(ty: QuestionType) -> Self {
        match ty {
            QuestionType::MultipleChoice => Self::MultipleChoice(ChoiceQuestion::default()),
            QuestionType::MultiSelect => Self::MultiSelect(ChoiceQuestion::default()),
            QuestionType::Text => Self::Text(TextQuestion::default()),
            QuestionType::Slider => Self::Slider(SliderQuestion::default()),
            QuestionType::Rating => Self::Rating(RatingQuestion::default()),
            QuestionType::Matrix => Self::Matrix(MatrixQuestion::default()),
            QuestionType::Information => Self::Information(InformationBlock::default()),
            QuestionType::SliderScale => Self::SliderScale(SliderScaleSettings::default()),
            QuestionType::DialGauge => Self::DialGauge(DialGaugeSettings::default()),
            QuestionType::LikertVisual => Self::LikertVisual(LikertVisualSettings::default()),
            QuestionType::Nps => Self::Nps(NpsSettings::default()),
            QuestionType::StarRating => Self::StarRating(StarRatingSettings::default()),
            QuestionType::DragAndDrop => Self::DragAndDrop(DragAndDropSettings::default()),
            QuestionType::SctLikert => Self::SctLikert(SctLikertQuestion::default()),
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::MultipleChoice(_) => QuestionType::MultipleChoice,
            Self::MultiSelect(_) => QuestionType::MultiSelect,
            Self::Text(_) => QuestionType::Text,
            Self::Slider(_) => QuestionType::Slider,
            Self::Rating(_) => QuestionType::Rating,
            Self::Matrix(_) => QuestionType::Matrix,
            Self::Information(_) => QuestionType::Information,
            Self::SliderScale(_) => QuestionType::SliderScale,
            Self::DialGauge(_) => QuestionType::DialGauge,
            Self::LikertVisual(_) => QuestionType::LikertVisual,
            Self::Nps(_) => QuestionType::Nps,
            Self::StarRating(_) => QuestionType::StarRating,
            Self::DragAndDrop(_) => QuestionType::DragAndDrop,
            Self::SctLikert(_) => QuestionType::SctLikert,
        }
    }

    /// The option labels, for types that have them.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::MultipleChoice(choice) | Self::MultiSelect(choice) => Some(&choice.options),
            Self::SctLikert(sct) => Some(&sct.options),
            _ => None,
        }
    }

    pub(crate) fn options_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            Self::MultipleChoice(choice) | Self::MultiSelect(choice) => Some(&mut choice.options),
            Self::SctLikert(sct) => Some(&mut sct.options),
            _ => None,
        }
    }

    /// Indices of the options marked correct, for choice types.
    pub fn correct_answers(&self) -> Option<&[usize]> {
        match self {
            Self::MultipleChoice(choice) | Self::MultiSelect(choice) => {
                Some(&choice.correct_answers)
            }
            _ => None,
        }
    }
}

/// Options plus the indices of the correct ones.
///
/// `correct_answers` holds option indices. Removing an option does not shift
/// these indices, so after a removal they may point at a different option or
/// past the end of the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceQuestion {
    pub options: Vec<String>,
    pub correct_answers: Vec<usize>,
}

impl ChoiceQuestion {
    pub fn new(options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            correct_answers: Vec::new(),
        }
    }
}

impl Default for ChoiceQuestion {
    fn default() -> Self {
        Self::new(["Option 1", "Option 2", "Option 3"])
    }
}

/// Free text answer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextQuestion {
    pub placeholder: String,
}

/// Integer slider.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderQuestion {
    pub min: i64,
    pub max: i64,
}

impl Default for SliderQuestion {
    fn default() -> Self {
        Self { min: 0, max: 100 }
    }
}

/// Rating from 1 to `scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingQuestion {
    pub scale: u32,
}

impl Default for RatingQuestion {
    fn default() -> Self {
        Self { scale: 5 }
    }
}

/// Grid of rows answered against shared columns.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixQuestion {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
}

impl MatrixQuestion {
    pub fn default_rows() -> Vec<String> {
        vec!["Row 1".to_string(), "Row 2".to_string()]
    }

    pub fn default_columns() -> Vec<String> {
        vec![
            "Column 1".to_string(),
            "Column 2".to_string(),
            "Column 3".to_string(),
        ]
    }
}

impl Default for MatrixQuestion {
    fn default() -> Self {
        Self {
            rows: Self::default_rows(),
            columns: Self::default_columns(),
        }
    }
}

/// Where an information block lists its links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HyperlinksPosition {
    Top,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperlink {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub url: String,
}

impl Hyperlink {
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            url: url.into(),
        }
    }
}

/// Rich text body with an optional list of links.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InformationBlock {
    pub body: String,
    pub hyperlinks: Vec<Hyperlink>,
    pub position: HyperlinksPosition,
}

/// Script concordance question: Likert labels plus scoring settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SctLikertQuestion {
    pub options: Vec<String>,
    pub settings: SctLikertSettings,
}

impl Default for SctLikertQuestion {
    fn default() -> Self {
        let settings = SctLikertSettings::default();
        Self {
            options: agreement_labels(settings.scale),
            settings,
        }
    }
}
