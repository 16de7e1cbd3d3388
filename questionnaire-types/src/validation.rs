use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{QuestionKind, Questionnaire};

/// Longest title the backend stores.
pub const MAX_TITLE_LEN: usize = 255;

/// Longest language code the backend stores.
pub const MAX_LANGUAGE_LEN: usize = 10;

/// Field path to messages, in the shape the backend reports them.
///
/// Paths follow the payload layout, e.g. `sections.0.questions.2.title`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Messages for one field.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Ok(())` if there is nothing to report.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn check_title(errors: &mut ValidationErrors, field: String, title: &str) {
    if title.trim().is_empty() {
        errors.add(field, "This field is required.");
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.add(
            field,
            format!("This field may not be greater than {MAX_TITLE_LEN} characters."),
        );
    }
}

impl Questionnaire {
    /// Check the rules the backend enforces on save, before sending anything.
    ///
    /// Question prompts longer than the title limit are not reported; the
    /// serializer truncates them.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_title(&mut errors, "title".to_string(), &self.meta.title);
        if self.meta.program_id.is_none() {
            errors.add("program_id", "Please select a program.");
        }
        for (i, language) in self.meta.languages.iter().enumerate() {
            if language.is_empty() || language.chars().count() > MAX_LANGUAGE_LEN {
                errors.add(
                    format!("languages.{i}"),
                    format!("Language codes must be 1 to {MAX_LANGUAGE_LEN} characters."),
                );
            }
        }
        if self.order.is_empty() {
            errors.add("sections", "At least one section is required.");
        }

        for (s, section) in self.sections().enumerate() {
            check_title(&mut errors, format!("sections.{s}.title"), section.title());

            for (q, question) in self.questions_in(section.id()).enumerate() {
                let prefix = format!("sections.{s}.questions.{q}");
                let is_information = matches!(question.kind(), QuestionKind::Information(_));
                if !is_information && question.prompt().trim().is_empty() {
                    errors.add(format!("{prefix}.title"), "Question text is required.");
                }
                if let Some(logic) = question.conditional_logic() {
                    if logic.targets().any(|t| !self.contains_question(t)) {
                        errors.add(
                            format!("{prefix}.conditionalLogic"),
                            "A condition refers to a question that no longer exists.",
                        );
                    }
                    if logic.targets().any(|t| t == question.id()) {
                        errors.add(
                            format!("{prefix}.conditionalLogic"),
                            "A question cannot depend on its own answer.",
                        );
                    }
                }
            }
        }

        errors.into_result()
    }
}
