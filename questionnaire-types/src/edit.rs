//! Mutation functions over a [`Questionnaire`].
//!
//! Every function takes the current tree by reference and returns a new tree
//! in which exactly the addressed node changed. Unknown ids and out-of-range
//! indices leave the tree unchanged; callers cannot tell a no-op from a
//! trivial success, apart from the `debug` log line it produces.
//!
//! [`Edit`] packages the same operations as data so they can be queued,
//! replayed or recorded, and [`Questionnaire::apply`] dispatches one.

use std::collections::BTreeMap;

use im::Vector;
use log::debug;

use crate::{
    ConditionalLogic, EditorSettings, Hyperlink, HyperlinksPosition, Question, QuestionId,
    QuestionKind, QuestionType, QuestionnaireKind, Questionnaire, Section, SectionId, Status,
    Translation,
};

/// A single replaceable field of a question.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionField {
    Prompt(String),
    /// Ignored by information blocks, whose description comes from the body.
    Description(String),
    Required(bool),
    ImageUrl(Option<String>),
    Translations(BTreeMap<String, Translation>),
    ConditionalLogic(Option<ConditionalLogic>),
    /// Text questions only.
    Placeholder(String),
    /// Rating questions only.
    Scale(u32),
    /// Slider questions only.
    Min(i64),
    /// Slider questions only.
    Max(i64),
    /// Information blocks only.
    Body(String),
    /// Information blocks only.
    Hyperlinks(Vec<Hyperlink>),
    /// Information blocks only.
    HyperlinksPosition(HyperlinksPosition),
    /// Replace the whole type-specific payload. Must keep the same type.
    Kind(QuestionKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionField {
    Title(String),
    Description(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetaField {
    Title(String),
    Description(String),
    ProgramId(Option<String>),
    Status(Status),
    Kind(QuestionnaireKind),
    Languages(Vec<String>),
}

/// One builder action, as data.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    AddSection,
    DeleteSection(SectionId),
    ReorderSections {
        from: usize,
        to: usize,
    },
    UpdateSection {
        section: SectionId,
        field: SectionField,
    },
    AddQuestion {
        section: SectionId,
        ty: QuestionType,
    },
    DeleteQuestion {
        section: SectionId,
        question: QuestionId,
    },
    DuplicateQuestion {
        section: SectionId,
        question: QuestionId,
    },
    UpdateQuestion {
        section: SectionId,
        question: QuestionId,
        field: QuestionField,
    },
    UpdateOption {
        section: SectionId,
        question: QuestionId,
        index: usize,
        value: String,
    },
    AddOption {
        section: SectionId,
        question: QuestionId,
    },
    RemoveOption {
        section: SectionId,
        question: QuestionId,
        index: usize,
    },
    UpdateMatrixRow {
        section: SectionId,
        question: QuestionId,
        index: usize,
        value: String,
    },
    UpdateMatrixColumn {
        section: SectionId,
        question: QuestionId,
        index: usize,
        value: String,
    },
    AddMatrixRow {
        section: SectionId,
        question: QuestionId,
    },
    AddMatrixColumn {
        section: SectionId,
        question: QuestionId,
    },
    RemoveMatrixRow {
        section: SectionId,
        question: QuestionId,
        index: usize,
    },
    RemoveMatrixColumn {
        section: SectionId,
        question: QuestionId,
        index: usize,
    },
    ToggleCorrectAnswer {
        section: SectionId,
        question: QuestionId,
        index: usize,
    },
    ReorderQuestions {
        section: SectionId,
        from: usize,
        to: usize,
    },
    UpdateMeta(MetaField),
    UpdateSettings(EditorSettings),
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Rows,
    Columns,
}

impl Axis {
    fn label(self) -> &'static str {
        match self {
            Self::Rows => "Row",
            Self::Columns => "Column",
        }
    }
}

/// Move the element at `from` to `to`. Returns `false` if either is out of range.
fn move_within<T: Clone>(items: &mut Vector<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}

impl Questionnaire {
    /// Apply one [`Edit`]. Ids created by the edit are discarded; use the
    /// dedicated methods when the caller needs them.
    pub fn apply(&self, edit: Edit) -> Self {
        match edit {
            Edit::AddSection => self.add_section().0,
            Edit::DeleteSection(section) => self.delete_section(section),
            Edit::ReorderSections { from, to } => self.reorder_sections(from, to),
            Edit::UpdateSection { section, field } => self.update_section(section, field),
            Edit::AddQuestion { section, ty } => self.add_question(section, ty).0,
            Edit::DeleteQuestion { section, question } => self.delete_question(section, question),
            Edit::DuplicateQuestion { section, question } => {
                self.duplicate_question(section, question).0
            }
            Edit::UpdateQuestion {
                section,
                question,
                field,
            } => self.update_question_field(section, question, field),
            Edit::UpdateOption {
                section,
                question,
                index,
                value,
            } => self.update_question_option(section, question, index, value),
            Edit::AddOption { section, question } => self.add_question_option(section, question),
            Edit::RemoveOption {
                section,
                question,
                index,
            } => self.remove_question_option(section, question, index),
            Edit::UpdateMatrixRow {
                section,
                question,
                index,
                value,
            } => self.update_matrix_row(section, question, index, value),
            Edit::UpdateMatrixColumn {
                section,
                question,
                index,
                value,
            } => self.update_matrix_column(section, question, index, value),
            Edit::AddMatrixRow { section, question } => self.add_matrix_row(section, question),
            Edit::AddMatrixColumn { section, question } => {
                self.add_matrix_column(section, question)
            }
            Edit::RemoveMatrixRow {
                section,
                question,
                index,
            } => self.remove_matrix_row(section, question, index),
            Edit::RemoveMatrixColumn {
                section,
                question,
                index,
            } => self.remove_matrix_column(section, question, index),
            Edit::ToggleCorrectAnswer {
                section,
                question,
                index,
            } => self.toggle_correct_answer(section, question, index),
            Edit::ReorderQuestions { section, from, to } => {
                self.reorder_questions(section, from, to)
            }
            Edit::UpdateMeta(field) => self.update_meta(field),
            Edit::UpdateSettings(settings) => self.update_settings(settings),
        }
    }

    // === Sections ===

    /// Append an empty section titled `Section N`.
    pub fn add_section(&self) -> (Self, SectionId) {
        let section = Section::new(format!("Section {}", self.order.len() + 1));
        let id = section.id;
        let mut next = self.clone();
        next.order.push_back(id);
        next.sections.insert(id, section);
        (next, id)
    }

    /// Remove a section and every question in it.
    pub fn delete_section(&self, section: SectionId) -> Self {
        let Some(position) = self.section_position(section) else {
            debug!("delete_section: no section {section}");
            return self.clone();
        };
        let mut next = self.clone();
        next.order.remove(position);
        if let Some(removed) = next.sections.remove(&section) {
            for question in removed.questions.iter() {
                next.questions.remove(question);
                next.owners.remove(question);
            }
        }
        next
    }

    /// Move the section at `from` to position `to`.
    pub fn reorder_sections(&self, from: usize, to: usize) -> Self {
        let mut next = self.clone();
        if !move_within(&mut next.order, from, to) {
            debug!(
                "reorder_sections: {from} -> {to} out of range for {} sections",
                self.order.len()
            );
            return self.clone();
        }
        next
    }

    pub fn update_section(&self, section: SectionId, field: SectionField) -> Self {
        let mut next = self.clone();
        let Some(target) = next.sections.get_mut(&section) else {
            debug!("update_section: no section {section}");
            return self.clone();
        };
        match field {
            SectionField::Title(title) => target.title = title,
            SectionField::Description(description) => target.description = description,
        }
        next
    }

    pub fn update_section_title(&self, section: SectionId, title: impl Into<String>) -> Self {
        self.update_section(section, SectionField::Title(title.into()))
    }

    pub fn update_section_description(
        &self,
        section: SectionId,
        description: impl Into<String>,
    ) -> Self {
        self.update_section(section, SectionField::Description(description.into()))
    }

    // === Questions ===

    /// Append a question of type `ty`, seeded with that type's defaults.
    pub fn add_question(&self, section: SectionId, ty: QuestionType) -> (Self, Option<QuestionId>) {
        if !self.sections.contains_key(&section) {
            debug!("add_question: no section {section}");
            return (self.clone(), None);
        }
        let question = Question::with_defaults(ty);
        let id = question.id;
        let mut next = self.clone();
        if let Some(target) = next.sections.get_mut(&section) {
            target.questions.push_back(id);
        }
        next.owners.insert(id, section);
        next.questions.insert(id, question);
        (next, Some(id))
    }

    pub fn delete_question(&self, section: SectionId, question: QuestionId) -> Self {
        let Some(position) = self.locate(section, question) else {
            return self.clone();
        };
        let mut next = self.clone();
        if let Some(target) = next.sections.get_mut(&section) {
            target.questions.remove(position);
        }
        next.questions.remove(&question);
        next.owners.remove(&question);
        next
    }

    /// Insert a copy of a question directly after it. The copy gets a fresh id.
    pub fn duplicate_question(
        &self,
        section: SectionId,
        question: QuestionId,
    ) -> (Self, Option<QuestionId>) {
        let Some(position) = self.locate(section, question) else {
            return (self.clone(), None);
        };
        let Some(copy) = self.questions.get(&question).map(Question::duplicate) else {
            return (self.clone(), None);
        };
        let id = copy.id;
        let mut next = self.clone();
        if let Some(target) = next.sections.get_mut(&section) {
            target.questions.insert(position + 1, id);
        }
        next.owners.insert(id, section);
        next.questions.insert(id, copy);
        (next, Some(id))
    }

    /// Move the question at `from` to position `to`, within one section.
    pub fn reorder_questions(&self, section: SectionId, from: usize, to: usize) -> Self {
        let mut next = self.clone();
        let Some(target) = next.sections.get_mut(&section) else {
            debug!("reorder_questions: no section {section}");
            return self.clone();
        };
        if !move_within(&mut target.questions, from, to) {
            debug!("reorder_questions: {from} -> {to} out of range in section {section}");
            return self.clone();
        }
        next
    }

    /// Replace exactly one field of a question.
    ///
    /// Fields that do not exist on the question's type are ignored, as is a
    /// [`QuestionField::Kind`] of a different type.
    pub fn update_question_field(
        &self,
        section: SectionId,
        question: QuestionId,
        field: QuestionField,
    ) -> Self {
        self.modify_question(section, question, |q| match field {
            QuestionField::Prompt(prompt) => {
                q.prompt = prompt;
                true
            }
            QuestionField::Description(description) => {
                if matches!(q.kind, QuestionKind::Information(_)) {
                    false
                } else {
                    q.description = description;
                    true
                }
            }
            QuestionField::Required(required) => {
                q.required = required;
                true
            }
            QuestionField::ImageUrl(url) => {
                q.image_url = url;
                true
            }
            QuestionField::Translations(translations) => {
                q.translations = translations;
                true
            }
            QuestionField::ConditionalLogic(logic) => {
                q.conditional_logic = logic.map(ConditionalLogic::normalized);
                true
            }
            QuestionField::Placeholder(placeholder) => match &mut q.kind {
                QuestionKind::Text(text) => {
                    text.placeholder = placeholder;
                    true
                }
                _ => false,
            },
            QuestionField::Scale(scale) => match &mut q.kind {
                QuestionKind::Rating(rating) => {
                    rating.scale = scale;
                    true
                }
                _ => false,
            },
            QuestionField::Min(min) => match &mut q.kind {
                QuestionKind::Slider(slider) => {
                    slider.min = min;
                    true
                }
                _ => false,
            },
            QuestionField::Max(max) => match &mut q.kind {
                QuestionKind::Slider(slider) => {
                    slider.max = max;
                    true
                }
                _ => false,
            },
            QuestionField::Body(body) => match &mut q.kind {
                QuestionKind::Information(info) => {
                    info.body = body;
                    true
                }
                _ => false,
            },
            QuestionField::Hyperlinks(links) => match &mut q.kind {
                QuestionKind::Information(info) => {
                    info.hyperlinks = links;
                    true
                }
                _ => false,
            },
            QuestionField::HyperlinksPosition(position) => match &mut q.kind {
                QuestionKind::Information(info) => {
                    info.position = position;
                    true
                }
                _ => false,
            },
            QuestionField::Kind(kind) => {
                if kind.question_type() == q.kind.question_type() {
                    q.kind = kind;
                    true
                } else {
                    false
                }
            }
        })
    }

    // === Options ===

    pub fn update_question_option(
        &self,
        section: SectionId,
        question: QuestionId,
        index: usize,
        value: impl Into<String>,
    ) -> Self {
        let value = value.into();
        self.modify_question(section, question, |q| {
            match q.kind.options_mut().and_then(|options| options.get_mut(index)) {
                Some(option) => {
                    *option = value;
                    true
                }
                None => false,
            }
        })
    }

    /// Append `Option N`, where N is the new option count.
    pub fn add_question_option(&self, section: SectionId, question: QuestionId) -> Self {
        self.modify_question(section, question, |q| match q.kind.options_mut() {
            Some(options) => {
                options.push(format!("Option {}", options.len() + 1));
                true
            }
            None => false,
        })
    }

    /// Remove the option at `index`.
    ///
    /// Correct-answer indices are left as they are, so they are not shifted
    /// to follow the remaining options.
    pub fn remove_question_option(
        &self,
        section: SectionId,
        question: QuestionId,
        index: usize,
    ) -> Self {
        self.modify_question(section, question, |q| match q.kind.options_mut() {
            Some(options) if index < options.len() => {
                options.remove(index);
                true
            }
            _ => false,
        })
    }

    /// Mark or unmark option `index` as correct.
    ///
    /// Multiple choice keeps at most one correct option: toggling a new option
    /// replaces the previous one, toggling the current one clears it.
    /// Multi-select toggles membership and keeps toggle order.
    pub fn toggle_correct_answer(
        &self,
        section: SectionId,
        question: QuestionId,
        index: usize,
    ) -> Self {
        self.modify_question(section, question, |q| match &mut q.kind {
            QuestionKind::MultipleChoice(choice) => {
                choice.correct_answers = if choice.correct_answers.contains(&index) {
                    Vec::new()
                } else {
                    vec![index]
                };
                true
            }
            QuestionKind::MultiSelect(choice) => {
                match choice.correct_answers.iter().position(|i| *i == index) {
                    Some(at) => {
                        choice.correct_answers.remove(at);
                    }
                    None => choice.correct_answers.push(index),
                }
                true
            }
            _ => false,
        })
    }

    // === Matrix ===

    pub fn update_matrix_row(
        &self,
        section: SectionId,
        question: QuestionId,
        index: usize,
        value: impl Into<String>,
    ) -> Self {
        self.update_matrix_label(section, question, Axis::Rows, index, value.into())
    }

    pub fn update_matrix_column(
        &self,
        section: SectionId,
        question: QuestionId,
        index: usize,
        value: impl Into<String>,
    ) -> Self {
        self.update_matrix_label(section, question, Axis::Columns, index, value.into())
    }

    pub fn add_matrix_row(&self, section: SectionId, question: QuestionId) -> Self {
        self.add_matrix_label(section, question, Axis::Rows)
    }

    pub fn add_matrix_column(&self, section: SectionId, question: QuestionId) -> Self {
        self.add_matrix_label(section, question, Axis::Columns)
    }

    pub fn remove_matrix_row(&self, section: SectionId, question: QuestionId, index: usize) -> Self {
        self.remove_matrix_label(section, question, Axis::Rows, index)
    }

    pub fn remove_matrix_column(
        &self,
        section: SectionId,
        question: QuestionId,
        index: usize,
    ) -> Self {
        self.remove_matrix_label(section, question, Axis::Columns, index)
    }

    fn update_matrix_label(
        &self,
        section: SectionId,
        question: QuestionId,
        axis: Axis,
        index: usize,
        value: String,
    ) -> Self {
        self.modify_matrix(section, question, axis, |labels| match labels.get_mut(index) {
            Some(label) => {
                *label = value;
                true
            }
            None => false,
        })
    }

    fn add_matrix_label(&self, section: SectionId, question: QuestionId, axis: Axis) -> Self {
        self.modify_matrix(section, question, axis, |labels| {
            labels.push(format!("{} {}", axis.label(), labels.len() + 1));
            true
        })
    }

    fn remove_matrix_label(
        &self,
        section: SectionId,
        question: QuestionId,
        axis: Axis,
        index: usize,
    ) -> Self {
        self.modify_matrix(section, question, axis, |labels| {
            if index < labels.len() {
                labels.remove(index);
                true
            } else {
                false
            }
        })
    }

    fn modify_matrix(
        &self,
        section: SectionId,
        question: QuestionId,
        axis: Axis,
        f: impl FnOnce(&mut Vec<String>) -> bool,
    ) -> Self {
        self.modify_question(section, question, |q| match &mut q.kind {
            QuestionKind::Matrix(matrix) => match axis {
                Axis::Rows => f(&mut matrix.rows),
                Axis::Columns => f(&mut matrix.columns),
            },
            _ => false,
        })
    }

    // === Questionnaire level ===

    pub fn update_meta(&self, field: MetaField) -> Self {
        let mut next = self.clone();
        let meta = &mut next.meta;
        match field {
            MetaField::Title(title) => meta.title = title,
            MetaField::Description(description) => meta.description = description,
            MetaField::ProgramId(program_id) => meta.program_id = program_id,
            MetaField::Status(status) => meta.status = status,
            MetaField::Kind(kind) => meta.kind = kind,
            MetaField::Languages(languages) => meta.languages = languages,
        }
        next
    }

    pub fn update_settings(&self, settings: EditorSettings) -> Self {
        let mut next = self.clone();
        next.settings = settings;
        next
    }

    // === Helpers ===

    /// Index of `question` inside `section`, if it really lives there.
    fn locate(&self, section: SectionId, question: QuestionId) -> Option<usize> {
        let position = self
            .sections
            .get(&section)
            .and_then(|s| s.position_of(question));
        if position.is_none() {
            debug!("no question {question} in section {section}");
        }
        position
    }

    /// Run `f` on a copy of the question. `f` returns whether it changed
    /// anything; if not, the original tree is returned.
    fn modify_question(
        &self,
        section: SectionId,
        question: QuestionId,
        f: impl FnOnce(&mut Question) -> bool,
    ) -> Self {
        if self.locate(section, question).is_none() {
            return self.clone();
        }
        let mut next = self.clone();
        let changed = next.questions.get_mut(&question).map(f).unwrap_or(false);
        if !changed {
            debug!("edit does not apply to question {question}");
            return self.clone();
        }
        next
    }
}
