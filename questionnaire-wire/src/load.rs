//! REST payload to in-memory tree.
//!
//! Loading assigns fresh local ids to every section and question and keeps
//! the backend's ids as remote ids. Records are placed by their `order` field
//! when present, otherwise by array position. Settings keys the typed model
//! does not cover are kept on the question so the next save writes them back.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::{debug, warn};
use questionnaire_types::settings::agreement_labels;
use questionnaire_types::{
    ChoiceQuestion, Combinator, Condition, ConditionalLogic, EditorSettings, InformationBlock,
    LogicAction, MatrixQuestion, Operator, Question, QuestionId, QuestionKind, QuestionType,
    Questionnaire, QuestionnaireMeta, RatingQuestion, RemoteId, SctLikertQuestion, Section,
    SliderQuestion, TextQuestion,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LoadError;
use crate::payload::{QuestionPayload, QuestionnairePayload, SectionPayload, unwrap_data};
use crate::serialize::QUESTION_KEY;
use crate::vocabulary::from_stored;

/// Keys the backend adds to records it returns. They are not sent back.
pub const SERVER_MANAGED_KEYS: &[&str] = &[
    "created_at",
    "updated_at",
    "deleted_at",
    "created_by",
    "updated_by",
    "questionnaire_id",
    "section_id",
    "program",
];

/// Build a questionnaire from a stored payload.
pub fn load(payload: &QuestionnairePayload) -> Result<Questionnaire, LoadError> {
    let settings: EditorSettings = serde_json::from_value(Value::Object(payload.settings.clone()))
        .map_err(LoadError::invalid_settings("settings"))?;

    let meta = QuestionnaireMeta {
        title: payload.title.clone(),
        description: payload.description.clone(),
        program_id: payload.program_id.clone(),
        status: payload.status,
        kind: payload.kind.clone(),
        languages: payload.languages.clone(),
        attributes: strip_server_keys(&payload.attributes),
    };

    let mut keys = KeyIndex::default();
    let mut loaded = Vec::with_capacity(payload.sections.len());
    for (s, section) in in_order(&payload.sections, |s| s.order).enumerate() {
        let mut questions = Vec::with_capacity(section.questions.len());
        for (q, question) in in_order(&section.questions, |q| q.order).enumerate() {
            let path = format!("sections.{s}.questions.{q}");
            let loaded = load_question(question, &path)?;
            keys.record(&loaded);
            questions.push((loaded.question, loaded.logic));
        }
        loaded.push((load_section(section), questions));
    }

    let mut tree = Questionnaire::empty().with_meta(meta).with_settings(settings);
    for (section, questions) in loaded {
        let questions = questions
            .into_iter()
            .map(|(question, logic)| match logic {
                Some(raw) => attach_logic(question, raw, &keys),
                None => question,
            })
            .collect();
        tree = tree.with_section(section, questions);
    }

    debug!(
        "loaded questionnaire with {} sections and {} questions",
        tree.section_count(),
        tree.question_count()
    );
    Ok(tree)
}

/// Build a questionnaire from a JSON value, bare or wrapped in `data`.
pub fn load_value(value: Value) -> Result<Questionnaire, LoadError> {
    let payload: QuestionnairePayload = serde_json::from_value(unwrap_data(value))?;
    load(&payload)
}

/// Build a questionnaire from a JSON response body.
pub fn from_json(body: &str) -> Result<Questionnaire, LoadError> {
    load_value(serde_json::from_str(body)?)
}

/// Records sorted by their `order` field, falling back to array position.
fn in_order<T>(records: &[T], order: impl Fn(&T) -> Option<i64>) -> impl Iterator<Item = &T> {
    let mut indexed: Vec<(i64, &T)> = records
        .iter()
        .enumerate()
        .map(|(i, record)| (order(record).unwrap_or(i as i64 + 1), record))
        .collect();
    indexed.sort_by_key(|(order, _)| *order);
    indexed.into_iter().map(|(_, record)| record)
}

fn strip_server_keys(attributes: &Map<String, Value>) -> Map<String, Value> {
    attributes
        .iter()
        .filter(|(key, _)| !SERVER_MANAGED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn load_section(section: &SectionPayload) -> Section {
    Section::new(section.title.clone())
        .with_description(section.description.clone())
        .with_remote_id(section.id.clone())
        .with_attributes(strip_server_keys(&section.attributes))
}

/// A question before its conditions are resolved.
struct LoadedQuestion {
    question: Question,
    key: Option<RemoteId>,
    logic: Option<Value>,
}

fn load_question(payload: &QuestionPayload, path: &str) -> Result<LoadedQuestion, LoadError> {
    let ty = from_stored(&payload.question_type).ok_or_else(|| LoadError::UnknownQuestionType {
        path: path.to_string(),
        tag: payload.question_type.clone(),
    })?;

    let mut settings = payload.settings.clone();
    let key = match settings.remove(QUESTION_KEY) {
        Some(value) => serde_json::from_value::<Option<RemoteId>>(value).unwrap_or_else(|err| {
            warn!("ignoring unreadable {QUESTION_KEY} at {path}: {err}");
            None
        }),
        None => None,
    };
    let image_url = take::<String>(&mut settings, "imageUrl")
        .map_err(LoadError::invalid_settings(&format!("{path}.settings.imageUrl")))?;
    let logic = settings.remove("conditionalLogic").filter(|v| !v.is_null());

    let kind = load_kind(ty, payload, &mut settings)
        .map_err(LoadError::invalid_settings(&format!("{path}.settings")))?;

    let prompt = match payload.formatted_title.as_deref() {
        Some(full) if !full.is_empty() => full.to_string(),
        _ => payload.title.clone(),
    };
    let description = match ty {
        QuestionType::Information => String::new(),
        _ => payload.description.clone(),
    };

    let question = Question::new(prompt, kind)
        .with_remote_id(payload.id.clone())
        .with_description(description)
        .with_required(payload.is_required)
        .with_image_url(image_url)
        .with_translations(payload.translations.clone().unwrap_or_default())
        .with_extra(settings)
        .with_attributes(strip_server_keys(&payload.attributes));
    Ok(LoadedQuestion {
        question,
        key,
        logic,
    })
}

/// Read the typed payload of a question, removing the keys it consumed from
/// `settings`.
fn load_kind(
    ty: QuestionType,
    payload: &QuestionPayload,
    settings: &mut Map<String, Value>,
) -> Result<QuestionKind, serde_json::Error> {
    let kind = match ty {
        QuestionType::MultipleChoice | QuestionType::MultiSelect => {
            let choice = ChoiceQuestion {
                options: option_labels(payload.options.as_deref()),
                correct_answers: take(settings, "correctAnswers")?.unwrap_or_default(),
            };
            if ty == QuestionType::MultipleChoice {
                QuestionKind::MultipleChoice(choice)
            } else {
                QuestionKind::MultiSelect(choice)
            }
        }
        QuestionType::Text => QuestionKind::Text(TextQuestion {
            placeholder: take(settings, "placeholder")?.unwrap_or_default(),
        }),
        QuestionType::Slider => {
            let defaults = SliderQuestion::default();
            QuestionKind::Slider(SliderQuestion {
                min: take(settings, "min")?.unwrap_or(defaults.min),
                max: take(settings, "max")?.unwrap_or(defaults.max),
            })
        }
        QuestionType::Rating => QuestionKind::Rating(RatingQuestion {
            scale: take(settings, "scale")?.unwrap_or(RatingQuestion::default().scale),
        }),
        QuestionType::Matrix => QuestionKind::Matrix(MatrixQuestion {
            rows: take::<Vec<String>>(settings, "rows")?
                .filter(|rows| !rows.is_empty())
                .unwrap_or_else(MatrixQuestion::default_rows),
            columns: take::<Vec<String>>(settings, "columns")?
                .filter(|columns| !columns.is_empty())
                .unwrap_or_else(MatrixQuestion::default_columns),
        }),
        QuestionType::Information => QuestionKind::Information(InformationBlock {
            body: take(settings, "formattedContent")?
                .unwrap_or_else(|| payload.description.clone()),
            hyperlinks: take(settings, "hyperlinks")?.unwrap_or_default(),
            position: take(settings, "hyperlinksPosition")?.unwrap_or_default(),
        }),
        QuestionType::SliderScale => QuestionKind::SliderScale(typed(settings)?),
        QuestionType::DialGauge => QuestionKind::DialGauge(typed(settings)?),
        QuestionType::LikertVisual => QuestionKind::LikertVisual(typed(settings)?),
        QuestionType::Nps => QuestionKind::Nps(typed(settings)?),
        QuestionType::StarRating => QuestionKind::StarRating(typed(settings)?),
        QuestionType::DragAndDrop => QuestionKind::DragAndDrop(typed(settings)?),
        QuestionType::SctLikert => {
            let settings: questionnaire_types::settings::SctLikertSettings = typed(settings)?;
            let options = match payload.options.as_deref() {
                Some(options) => option_labels(Some(options)),
                None => agreement_labels(settings.scale),
            };
            QuestionKind::SctLikert(SctLikertQuestion { options, settings })
        }
    };
    Ok(kind)
}

/// Remove `key` and read it as `T`. A `null` value reads as absent.
fn take<T: DeserializeOwned>(
    settings: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<T>, serde_json::Error> {
    match settings.remove(key) {
        Some(value) => serde_json::from_value::<Option<T>>(value),
        None => Ok(None),
    }
}

/// Read a typed settings struct from the whole map and remove the keys it
/// writes back on save. Whatever remains is kept as unknown settings.
fn typed<T: DeserializeOwned + Serialize>(
    settings: &mut Map<String, Value>,
) -> Result<T, serde_json::Error> {
    let parsed: T = serde_json::from_value(Value::Object(settings.clone()))?;
    if let Value::Object(known) = serde_json::to_value(&parsed)? {
        for key in known.keys() {
            settings.remove(key);
        }
    }
    Ok(parsed)
}

/// Option labels, tolerating `{label}` or `{text}` objects from other editors.
fn option_labels(options: Option<&[Value]>) -> Vec<String> {
    options
        .unwrap_or_default()
        .iter()
        .filter_map(|option| match option {
            Value::String(label) => Some(label.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Object(map) => map
                .get("label")
                .or_else(|| map.get("text"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect()
}

/// Lookup from the ids used in stored conditions to freshly assigned ids.
///
/// A question's `questionKey` setting wins over its record id, so conditions
/// written before the backend assigned ids still resolve. A reference claimed
/// by more than one question maps to `None` and resolves to nothing.
#[derive(Default)]
struct KeyIndex {
    by_key: HashMap<RemoteId, Option<QuestionId>>,
    by_id: HashMap<RemoteId, Option<QuestionId>>,
}

impl KeyIndex {
    fn record(&mut self, loaded: &LoadedQuestion) {
        let id = loaded.question.id();
        if let Some(key) = &loaded.key {
            claim(&mut self.by_key, key, id);
        }
        if let Some(remote) = loaded.question.remote_id() {
            claim(&mut self.by_id, remote, id);
        }
    }

    fn resolve(&self, reference: &RemoteId) -> Option<QuestionId> {
        self.by_key
            .get(reference)
            .copied()
            .flatten()
            .or_else(|| self.by_id.get(reference).copied().flatten())
    }
}

fn claim(index: &mut HashMap<RemoteId, Option<QuestionId>>, reference: &RemoteId, id: QuestionId) {
    match index.entry(reference.clone()) {
        Entry::Vacant(slot) => {
            slot.insert(Some(id));
        }
        Entry::Occupied(mut slot) => {
            warn!("more than one question is known as {reference}; conditions cannot use it");
            slot.insert(None);
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLogic {
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default)]
    action: LogicAction,
    #[serde(default, alias = "combinator")]
    logic_type: Combinator,
    #[serde(default)]
    conditions: Vec<StoredCondition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCondition {
    question_id: RemoteId,
    operator: Operator,
    #[serde(default)]
    value: Option<Value>,
}

fn enabled_by_default() -> bool {
    true
}

/// Attach a stored rule to `question`. A rule that cannot be read is kept
/// verbatim among the unknown settings instead.
fn attach_logic(question: Question, raw: Value, keys: &KeyIndex) -> Question {
    let stored: StoredLogic = match serde_json::from_value(raw.clone()) {
        Ok(stored) => stored,
        Err(err) => {
            warn!("keeping unreadable conditional logic on question {}: {err}", question.id());
            let mut extra = question.extra().clone();
            extra.insert("conditionalLogic".into(), raw);
            return question.with_extra(extra);
        }
    };

    let conditions = stored
        .conditions
        .into_iter()
        .filter_map(|condition| match keys.resolve(&condition.question_id) {
            Some(target) => Some(Condition::new(target, condition.operator, condition.value)),
            None => {
                warn!(
                    "dropping condition on question {}: no question with id {}",
                    question.id(),
                    condition.question_id
                );
                None
            }
        })
        .collect();

    question.with_conditional_logic(Some(ConditionalLogic {
        enabled: stored.enabled,
        action: stored.action,
        combinator: stored.logic_type,
        conditions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn question(body: Value) -> Value {
        json!({
            "title": "Pulse",
            "sections": [{ "id": 10, "title": "Only", "questions": [body] }],
        })
    }

    fn first(tree: &Questionnaire) -> &Question {
        tree.all_questions().next().unwrap()
    }

    #[test]
    fn test_records_are_placed_by_order() {
        let tree = load_value(json!({
            "title": "Pulse",
            "sections": [
                { "title": "Second", "order": 2, "questions": [] },
                { "title": "First", "order": 1, "questions": [
                    { "type": "text", "title": "b", "order": 2 },
                    { "type": "text", "title": "a", "order": 1 },
                ]},
            ],
        }))
        .unwrap();

        let titles: Vec<_> = tree.sections().map(|s| s.title().to_string()).collect();
        assert_eq!(titles, ["First", "Second"]);
        let prompts: Vec<_> = tree.all_questions().map(|q| q.prompt().to_string()).collect();
        assert_eq!(prompts, ["a", "b"]);
    }

    #[test]
    fn test_stored_tags_map_back() {
        let tree = load_value(question(json!({
            "id": 7, "type": "checkbox", "title": "Pick", "options": ["x", {"label": "y"}],
            "settings": { "correctAnswers": [1] },
        })))
        .unwrap();
        let q = first(&tree);
        assert_eq!(q.question_type(), QuestionType::MultiSelect);
        assert_eq!(q.kind().options(), Some(&["x".to_string(), "y".to_string()][..]));
        assert_eq!(q.kind().correct_answers(), Some(&[1usize][..]));
        assert_eq!(q.remote_id(), Some(&RemoteId::Int(7)));
        assert!(q.extra().is_empty());
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let err = load_value(question(json!({ "type": "hologram", "title": "?" }))).unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnknownQuestionType { ref tag, ref path } if tag == "hologram" && path == "sections.0.questions.0"
        ));
    }

    #[test]
    fn test_matrix_defaults_fill_empty_lists() {
        let tree = load_value(question(json!({
            "type": "matrix", "title": "Grid", "settings": { "rows": [], "columns": null },
        })))
        .unwrap();
        let QuestionKind::Matrix(matrix) = first(&tree).kind() else {
            panic!("expected a matrix");
        };
        assert_eq!(matrix.rows, MatrixQuestion::default_rows());
        assert_eq!(matrix.columns, MatrixQuestion::default_columns());
    }

    #[test]
    fn test_information_body_falls_back_to_description() {
        let tree = load_value(question(json!({
            "type": "information", "title": "Information Block", "description": "Read me",
        })))
        .unwrap();
        let q = first(&tree);
        let QuestionKind::Information(info) = q.kind() else {
            panic!("expected an information block");
        };
        assert_eq!(info.body, "Read me");
        assert_eq!(q.description(), "");
    }

    #[test]
    fn test_unknown_settings_and_server_keys() {
        let tree = load_value(json!({
            "data": {
                "id": "q-1",
                "title": "Pulse",
                "created_at": "2024-01-01T00:00:00Z",
                "scheduled_start": "2024-02-01",
                "sections": [{
                    "title": "A",
                    "questionnaire_id": "q-1",
                    "questions": [{
                        "type": "nps", "title": "Recommend?",
                        "section_id": 3, "is_comment_enabled": true,
                        "settings": { "labels": { "left": "Nope" }, "accent": "teal" },
                    }],
                }],
            }
        }))
        .unwrap();

        assert_eq!(tree.meta().attributes.get("scheduled_start"), Some(&json!("2024-02-01")));
        assert!(!tree.meta().attributes.contains_key("created_at"));
        assert!(tree.sections().next().unwrap().attributes().is_empty());

        let q = first(&tree);
        assert_eq!(q.attributes().get("is_comment_enabled"), Some(&json!(true)));
        assert!(!q.attributes().contains_key("section_id"));
        assert_eq!(q.extra().get("accent"), Some(&json!("teal")));
        assert!(!q.extra().contains_key("labels"));
    }

    #[test]
    fn test_conditions_resolve_by_key_then_id() {
        let tree = load_value(json!({
            "title": "Pulse",
            "sections": [{ "title": "A", "questions": [
                { "id": 1, "type": "text", "title": "Name", "settings": { "questionKey": 900 } },
                { "id": 2, "type": "rating", "title": "Score" },
                { "id": 3, "type": "text", "title": "Why", "settings": { "conditionalLogic": {
                    "action": "hide",
                    "logicType": "any",
                    "conditions": [
                        { "questionId": 900, "operator": "answered" },
                        { "questionId": 2, "operator": "greater_than", "value": 3 },
                        { "questionId": 404, "operator": "answered" },
                    ],
                }}},
            ]}],
        }))
        .unwrap();

        let ids: Vec<_> = tree.all_questions().map(Question::id).collect();
        let logic = tree.question(ids[2]).unwrap().conditional_logic().unwrap();
        assert!(logic.enabled);
        assert_eq!(logic.action, LogicAction::Hide);
        assert_eq!(logic.combinator, Combinator::Any);
        assert_eq!(logic.targets().collect::<Vec<_>>(), vec![ids[0], ids[1]]);
        assert_eq!(logic.conditions[1].value, Some(json!(3)));
    }

    #[test]
    fn test_unreadable_logic_is_kept_verbatim() {
        let raw = json!({ "conditions": "sometimes" });
        let tree = load_value(question(json!({
            "type": "text", "title": "Why", "settings": { "conditionalLogic": raw },
        })))
        .unwrap();
        let q = first(&tree);
        assert!(q.conditional_logic().is_none());
        assert_eq!(q.extra().get("conditionalLogic"), Some(&raw));
    }

    #[test]
    fn test_formatted_title_wins_over_title() {
        let full = "x".repeat(300);
        let tree = load_value(question(json!({
            "type": "text", "title": "x".repeat(255), "formatted_title": full,
        })))
        .unwrap();
        assert_eq!(first(&tree).prompt(), full);
    }

    #[test]
    fn test_shared_key_does_not_redirect_conditions() {
        let tree = load_value(json!({
            "title": "Pulse",
            "sections": [{ "title": "A", "questions": [
                { "id": 8, "type": "text", "title": "One", "settings": { "questionKey": 5 } },
                { "id": 9, "type": "text", "title": "Two", "settings": { "questionKey": 5 } },
                { "id": 5, "type": "text", "title": "Three" },
                { "type": "text", "title": "Why", "settings": { "conditionalLogic": {
                    "conditions": [
                        { "questionId": 5, "operator": "answered" },
                        { "questionId": 9, "operator": "answered" },
                    ],
                }}},
            ]}],
        }))
        .unwrap();

        let ids: Vec<_> = tree.all_questions().map(Question::id).collect();
        let logic = tree.question(ids[3]).unwrap().conditional_logic().unwrap();
        assert_eq!(logic.targets().collect::<Vec<_>>(), vec![ids[2], ids[1]]);
    }

    #[test]
    fn test_renderer_enum_values_load_and_save() {
        let tree = load_value(json!({
            "title": "Pulse",
            "sections": [{ "title": "A", "questions": [
                { "type": "dial_gauge", "title": "Mood", "settings": { "gaugeType": "semi-circle" } },
                { "type": "likert_visual", "title": "Agree?", "settings": { "iconStyle": "filled" } },
                { "type": "nps", "title": "Recommend?", "settings": { "displayStyle": "dots" } },
            ]}],
        }))
        .unwrap();
        assert_eq!(tree.question_count(), 3);

        let payload = crate::serialize(&tree);
        let settings: Vec<_> = payload.sections[0].questions.iter().map(|q| &q.settings).collect();
        assert_eq!(settings[0]["gaugeType"], json!("semi-circle"));
        assert_eq!(settings[1]["iconStyle"], json!("filled"));
        assert_eq!(settings[2]["displayStyle"], json!("dots"));
    }
}
