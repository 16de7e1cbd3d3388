//! Show/hide rules attached to questions.
//!
//! A rule refers to other questions by id. These references are weak: a rule
//! may outlive its target, in which case the dangling condition is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AnswerValue, Answers, QuestionId, Questionnaire};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicAction {
    #[default]
    Show,
    Hide,
}

/// How the individual conditions of a rule are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    #[default]
    All,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    Answered,
    NotAnswered,
}

/// One test against another question's answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub question: QuestionId,
    pub operator: Operator,
    /// Operand; ignored by `Answered` and `NotAnswered`. A JSON `null`
    /// operand is stored as `None`.
    pub value: Option<Value>,
}

impl Condition {
    pub fn new(question: QuestionId, operator: Operator, value: Option<Value>) -> Self {
        Self {
            question,
            operator,
            value: value.filter(|v| !v.is_null()),
        }
    }
}

/// Visibility rule of a question.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalLogic {
    pub enabled: bool,
    pub action: LogicAction,
    pub combinator: Combinator,
    pub conditions: Vec<Condition>,
}

impl ConditionalLogic {
    /// An enabled rule showing the question when every condition holds.
    pub fn show_when(conditions: Vec<Condition>) -> Self {
        Self {
            enabled: true,
            action: LogicAction::Show,
            combinator: Combinator::All,
            conditions,
        }
    }

    pub fn with_action(mut self, action: LogicAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_combinator(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;
        self
    }

    /// The same rule with `null` operands stored as `None`.
    pub(crate) fn normalized(mut self) -> Self {
        for condition in &mut self.conditions {
            if condition.value.as_ref().is_some_and(Value::is_null) {
                condition.value = None;
            }
        }
        self
    }

    /// Ids of the questions this rule reads.
    pub fn targets(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.conditions.iter().map(|c| c.question)
    }
}

impl Questionnaire {
    /// Whether `question` is shown given the answers collected so far.
    ///
    /// Questions without an enabled rule, and rules whose conditions all
    /// point at deleted questions, are always visible.
    pub fn is_visible(&self, question: QuestionId, answers: &Answers) -> bool {
        let Some(logic) = self
            .question(question)
            .and_then(|q| q.conditional_logic())
            .filter(|logic| logic.enabled)
        else {
            return true;
        };

        let mut outcomes = logic
            .conditions
            .iter()
            .filter(|c| self.contains_question(c.question))
            .map(|c| self.condition_holds(c, answers))
            .peekable();

        if outcomes.peek().is_none() {
            return true;
        }

        let passed = match logic.combinator {
            Combinator::All => outcomes.all(|held| held),
            Combinator::Any => outcomes.any(|held| held),
        };

        match logic.action {
            LogicAction::Show => passed,
            LogicAction::Hide => !passed,
        }
    }

    /// Ids of every visible question, in questionnaire order.
    pub fn visible_questions(&self, answers: &Answers) -> Vec<QuestionId> {
        self.all_questions()
            .map(|q| q.id())
            .filter(|id| self.is_visible(*id, answers))
            .collect()
    }

    fn condition_holds(&self, condition: &Condition, answers: &Answers) -> bool {
        let answer = answers.get(condition.question).filter(|a| !a.is_blank());
        let options = self
            .question(condition.question)
            .and_then(|q| q.kind().options());

        match condition.operator {
            Operator::Answered => answer.is_some(),
            Operator::NotAnswered => answer.is_none(),
            Operator::Equals => match (answer, &condition.value) {
                (Some(a), Some(v)) => answer_equals(a, v, options),
                _ => false,
            },
            Operator::NotEquals => match (answer, &condition.value) {
                (Some(a), Some(v)) => !answer_equals(a, v, options),
                _ => true,
            },
            Operator::Contains => match (answer, &condition.value) {
                (Some(a), Some(v)) => answer_contains(a, v, options),
                _ => false,
            },
            Operator::GreaterThan => compare(answer, &condition.value, |a, b| a > b),
            Operator::LessThan => compare(answer, &condition.value, |a, b| a < b),
        }
    }
}

/// Whether option `index` matches a rule operand given as index or label.
fn option_matches(index: usize, value: &Value, options: Option<&[String]>) -> bool {
    match value {
        Value::Number(n) => n.as_u64() == Some(index as u64),
        Value::String(s) => options
            .and_then(|opts| opts.get(index))
            .is_some_and(|label| label == s),
        _ => false,
    }
}

fn answer_equals(answer: &AnswerValue, value: &Value, options: Option<&[String]>) -> bool {
    match answer {
        AnswerValue::Text(text) => value.as_str() == Some(text.as_str()),
        AnswerValue::Number(n) => value.as_f64() == Some(*n),
        AnswerValue::Bool(b) => value.as_bool() == Some(*b),
        AnswerValue::Choice(index) => option_matches(*index, value, options),
        AnswerValue::Choices(indices) => match value {
            Value::Array(expected) => {
                indices.len() == expected.len()
                    && expected
                        .iter()
                        .all(|v| indices.iter().any(|i| option_matches(*i, v, options)))
            }
            single => indices.len() == 1 && option_matches(indices[0], single, options),
        },
    }
}

fn answer_contains(answer: &AnswerValue, value: &Value, options: Option<&[String]>) -> bool {
    match answer {
        AnswerValue::Text(text) => value
            .as_str()
            .is_some_and(|needle| text.to_lowercase().contains(&needle.to_lowercase())),
        AnswerValue::Choices(indices) => indices.iter().any(|i| option_matches(*i, value, options)),
        other => answer_equals(other, value, options),
    }
}

fn compare(answer: Option<&AnswerValue>, value: &Option<Value>, op: fn(f64, f64) -> bool) -> bool {
    let lhs = match answer {
        Some(AnswerValue::Number(n)) => *n,
        Some(AnswerValue::Choice(i)) => *i as f64,
        Some(AnswerValue::Text(s)) => match s.trim().parse() {
            Ok(n) => n,
            Err(_) => return false,
        },
        _ => return false,
    };
    value
        .as_ref()
        .and_then(Value::as_f64)
        .is_some_and(|rhs| op(lhs, rhs))
}
