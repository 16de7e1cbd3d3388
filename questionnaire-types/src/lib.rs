//! Core types for the questionnaire builder.
//!
//! This crate provides the in-memory model edited by the builder:
//! - `Questionnaire` - The editable tree of sections and questions
//! - `Section` and `Question` - The records it is made of
//! - `QuestionKind` and the `settings` module - Type-specific payloads
//! - `Edit` and the mutation methods - Pure transforms producing a new tree
//! - `History` - Undo/redo over tree snapshots
//! - `ConditionalLogic` and `Answers` - Show/hide rules and their evaluation
//! - `ValidationErrors` - Save-time checks mirroring the backend's rules

mod id;
pub use id::{QuestionId, RemoteId, SectionId};

mod question_type;
pub use question_type::{QuestionType, UnknownQuestionType};

pub mod settings;

mod question;
pub use question::{
    ChoiceQuestion, Hyperlink, HyperlinksPosition, INFORMATION_BLOCK_TITLE, InformationBlock,
    MatrixQuestion, Question, QuestionKind, RatingQuestion, SctLikertQuestion, SliderQuestion,
    TextQuestion, Translation,
};

mod section;
pub use section::Section;

mod meta;
pub use meta::{EditorSettings, QuestionnaireKind, QuestionnaireMeta, SectionHeaderFormat, Status};

mod questionnaire;
pub use questionnaire::Questionnaire;

mod edit;
pub use edit::{Edit, MetaField, QuestionField, SectionField};

mod history;
pub use history::{DEFAULT_HISTORY_LIMIT, History};

mod answers;
pub use answers::{AnswerValue, Answers};

mod logic;
pub use logic::{Combinator, Condition, ConditionalLogic, LogicAction, Operator};

mod validation;
pub use validation::{MAX_LANGUAGE_LEN, MAX_TITLE_LEN, ValidationErrors};
