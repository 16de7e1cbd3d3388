use im::Vector;
use serde_json::{Map, Value};

use crate::{QuestionId, RemoteId, SectionId};

/// An ordered group of questions with its own title and description.
///
/// A section stores only the ids of its questions; the question records
/// themselves live in the owning [`Questionnaire`](crate::Questionnaire).
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub(crate) id: SectionId,
    pub(crate) remote_id: Option<RemoteId>,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) questions: Vector<QuestionId>,
    pub(crate) attributes: Map<String, Value>,
}

impl Section {
    /// Create an empty section with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: SectionId::fresh(),
            remote_id: None,
            title: title.into(),
            description: String::new(),
            questions: Vector::new(),
            attributes: Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_remote_id(mut self, remote_id: Option<RemoteId>) -> Self {
        self.remote_id = remote_id;
        self
    }

    /// Attach record-level keys this crate does not model, such as
    /// `translations`.
    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn remote_id(&self) -> Option<&RemoteId> {
        self.remote_id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Question ids in display order.
    pub fn question_ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub(crate) fn position_of(&self, question: QuestionId) -> Option<usize> {
        self.questions.index_of(&question)
    }
}
