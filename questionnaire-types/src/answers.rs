use std::collections::HashMap;

use crate::QuestionId;

/// A participant's answer to one question.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Index of the chosen option.
    Choice(usize),
    /// Indices of the chosen options.
    Choices(Vec<usize>),
}

impl AnswerValue {
    /// An empty text or an empty selection does not count as an answer.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Choices(indices) => indices.is_empty(),
            _ => false,
        }
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<usize>> for AnswerValue {
    fn from(indices: Vec<usize>) -> Self {
        Self::Choices(indices)
    }
}

/// Answers collected so far, keyed by question.
///
/// Used to decide which questions conditional logic shows.
#[derive(Debug, Clone, Default)]
pub struct Answers {
    values: HashMap<QuestionId, AnswerValue>,
}

impl Answers {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn insert(&mut self, question: QuestionId, value: impl Into<AnswerValue>) {
        self.values.insert(question, value.into());
    }

    /// Builder form of [`Answers::insert`].
    pub fn with(mut self, question: QuestionId, value: impl Into<AnswerValue>) -> Self {
        self.insert(question, value);
        self
    }

    /// Record the index of a single chosen option.
    pub fn with_choice(mut self, question: QuestionId, index: usize) -> Self {
        self.values.insert(question, AnswerValue::Choice(index));
        self
    }

    pub fn get(&self, question: QuestionId) -> Option<&AnswerValue> {
        self.values.get(&question)
    }

    pub fn remove(&mut self, question: QuestionId) -> Option<AnswerValue> {
        self.values.remove(&question)
    }

    /// Whether a non-blank answer exists for the question.
    pub fn is_answered(&self, question: QuestionId) -> bool {
        self.get(question).is_some_and(|value| !value.is_blank())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_answers_do_not_count() {
        let q = QuestionId::fresh();
        let answers = Answers::new().with(q, "   ");
        assert!(!answers.is_answered(q));
        let answers = answers.with(q, vec![1]);
        assert!(answers.is_answered(q));
    }

    #[test]
    fn test_removed_answer_is_gone() {
        let q = QuestionId::fresh();
        let mut answers = Answers::new().with_choice(q, 2);
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.remove(q), Some(AnswerValue::Choice(2)));
        assert!(answers.is_empty());
        assert!(!answers.is_answered(q));
    }
}
