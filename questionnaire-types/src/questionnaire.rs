use im::{OrdMap, Vector};

use crate::{
    Condition, EditorSettings, Question, QuestionId, QuestionKind, QuestionnaireMeta, Section,
    SectionId, Translation,
};

/// The editable questionnaire: ordered sections, each holding ordered questions.
///
/// Records are kept in id-addressed maps with an ordered id list per level and
/// an owner index from question to section. All collections are persistent, so
/// cloning a questionnaire is cheap and the edit methods return a new value
/// that shares every untouched record with the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct Questionnaire {
    pub(crate) meta: QuestionnaireMeta,
    pub(crate) settings: EditorSettings,
    pub(crate) order: Vector<SectionId>,
    pub(crate) sections: OrdMap<SectionId, Section>,
    pub(crate) questions: OrdMap<QuestionId, Question>,
    pub(crate) owners: OrdMap<QuestionId, SectionId>,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::new()
    }
}

impl Questionnaire {
    /// A blank questionnaire with a single empty section, as the builder opens.
    pub fn new() -> Self {
        Self::empty().with_section(Section::new("Section 1"), Vec::new())
    }

    /// A questionnaire with no sections at all.
    pub fn empty() -> Self {
        Self {
            meta: QuestionnaireMeta::default(),
            settings: EditorSettings::default(),
            order: Vector::new(),
            sections: OrdMap::new(),
            questions: OrdMap::new(),
            owners: OrdMap::new(),
        }
    }

    pub fn with_meta(mut self, meta: QuestionnaireMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_settings(mut self, settings: EditorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Append a section together with its questions.
    ///
    /// Any question ids already listed on `section` are replaced by the ids of
    /// `questions`, in order.
    pub fn with_section(mut self, mut section: Section, questions: Vec<Question>) -> Self {
        section.questions = questions.iter().map(Question::id).collect();
        for question in questions {
            self.owners.insert(question.id, section.id);
            self.questions.insert(question.id, question);
        }
        self.order.push_back(section.id);
        self.sections.insert(section.id, section);
        self
    }

    pub fn meta(&self) -> &QuestionnaireMeta {
        &self.meta
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Section ids in display order.
    pub fn section_ids(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.order.iter().copied()
    }

    /// Sections in display order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> + '_ {
        self.order.iter().filter_map(|id| self.sections.get(id))
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(&id)
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.get(&id)
    }

    /// Questions of one section in display order. Empty for an unknown section.
    pub fn questions_in(&self, section: SectionId) -> impl Iterator<Item = &Question> + '_ {
        self.sections
            .get(&section)
            .into_iter()
            .flat_map(|s| s.questions.iter())
            .filter_map(|id| self.questions.get(id))
    }

    /// Every question, section by section.
    pub fn all_questions(&self) -> impl Iterator<Item = &Question> + '_ {
        self.order.iter().flat_map(|id| self.questions_in(*id))
    }

    /// The section that currently holds `question`.
    pub fn owner_of(&self, question: QuestionId) -> Option<SectionId> {
        self.owners.get(&question).copied()
    }

    pub fn contains_question(&self, question: QuestionId) -> bool {
        self.questions.contains_key(&question)
    }

    pub fn section_count(&self) -> usize {
        self.order.len()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn section_position(&self, section: SectionId) -> Option<usize> {
        self.order.index_of(&section)
    }

    /// Position of a question as `(section index, index within section)`.
    pub fn question_position(&self, question: QuestionId) -> Option<(usize, usize)> {
        let section = self.owner_of(question)?;
        let outer = self.section_position(section)?;
        let inner = self.sections.get(&section)?.position_of(question)?;
        Some((outer, inner))
    }

    /// Compare two questionnaires ignoring ids.
    ///
    /// Content, settings and ordering must match. Conditional logic is
    /// compared by the position of the question each condition points at, so
    /// a tree and its reloaded copy compare equal even though every id
    /// changed. Conditions pointing at deleted questions are not compared.
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    fn shape(&self) -> TreeShape<'_> {
        TreeShape {
            meta: &self.meta,
            settings: &self.settings,
            sections: self
                .sections()
                .map(|section| SectionShape {
                    title: &section.title,
                    description: &section.description,
                    attributes: &section.attributes,
                    questions: self
                        .questions_in(section.id)
                        .map(|q| self.question_shape(q))
                        .collect(),
                })
                .collect(),
        }
    }

    fn question_shape<'a>(&'a self, question: &'a Question) -> QuestionShape<'a> {
        let logic = question.conditional_logic.as_ref().map(|logic| LogicShape {
            enabled: logic.enabled,
            action: logic.action,
            combinator: logic.combinator,
            conditions: logic
                .conditions
                .iter()
                .filter_map(|c| self.condition_shape(c))
                .collect(),
        });
        QuestionShape {
            prompt: &question.prompt,
            description: &question.description,
            required: question.required,
            image_url: question.image_url.as_deref(),
            translations: &question.translations,
            kind: &question.kind,
            extra: &question.extra,
            attributes: &question.attributes,
            logic,
        }
    }

    fn condition_shape<'a>(&self, condition: &'a Condition) -> Option<ConditionShape<'a>> {
        Some(ConditionShape {
            target: self.question_position(condition.question)?,
            operator: condition.operator,
            value: condition.value.as_ref(),
        })
    }
}

#[derive(PartialEq)]
struct TreeShape<'a> {
    meta: &'a QuestionnaireMeta,
    settings: &'a EditorSettings,
    sections: Vec<SectionShape<'a>>,
}

#[derive(PartialEq)]
struct SectionShape<'a> {
    title: &'a str,
    description: &'a str,
    attributes: &'a serde_json::Map<String, serde_json::Value>,
    questions: Vec<QuestionShape<'a>>,
}

#[derive(PartialEq)]
struct QuestionShape<'a> {
    prompt: &'a str,
    description: &'a str,
    required: bool,
    image_url: Option<&'a str>,
    translations: &'a std::collections::BTreeMap<String, Translation>,
    kind: &'a QuestionKind,
    extra: &'a serde_json::Map<String, serde_json::Value>,
    attributes: &'a serde_json::Map<String, serde_json::Value>,
    logic: Option<LogicShape<'a>>,
}

#[derive(PartialEq)]
struct LogicShape<'a> {
    enabled: bool,
    action: crate::LogicAction,
    combinator: crate::Combinator,
    conditions: Vec<ConditionShape<'a>>,
}

#[derive(PartialEq)]
struct ConditionShape<'a> {
    target: (usize, usize),
    operator: crate::Operator,
    value: Option<&'a serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestionType;

    #[test]
    fn test_new_has_one_section() {
        let tree = Questionnaire::new();
        assert_eq!(tree.section_count(), 1);
        assert_eq!(tree.sections().next().unwrap().title(), "Section 1");
        assert_eq!(tree.question_count(), 0);
    }

    #[test]
    fn test_with_section_indexes_owners() {
        let question = Question::with_defaults(QuestionType::Text);
        let qid = question.id();
        let section = Section::new("Intro");
        let sid = section.id();
        let tree = Questionnaire::empty().with_section(section, vec![question]);

        assert_eq!(tree.owner_of(qid), Some(sid));
        assert_eq!(tree.question_position(qid), Some((0, 0)));
        assert_eq!(tree.questions_in(sid).count(), 1);
    }

    #[test]
    fn test_structural_equality_ignores_ids() {
        let build = || {
            Questionnaire::empty().with_section(
                Section::new("A").with_description("first"),
                vec![
                    Question::with_defaults(QuestionType::Matrix),
                    Question::with_defaults(QuestionType::Nps),
                ],
            )
        };
        let (a, b) = (build(), build());
        assert_ne!(a, b);
        assert!(a.structurally_eq(&b));

        let c = Questionnaire::empty().with_section(Section::new("A"), Vec::new());
        assert!(!a.structurally_eq(&c));
    }
}
