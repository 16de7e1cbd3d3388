//! In-memory tree to REST payload.
//!
//! Serialization is a pure function of the tree: no clocks, no random ids.
//! JSON objects built here are `serde_json::Map`s, which keep their keys
//! sorted, so the same tree always produces the same bytes.

use log::warn;
use questionnaire_types::{
    ConditionalLogic, MAX_TITLE_LEN, Question, QuestionKind, Questionnaire, RemoteId, Section,
};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::payload::{QuestionPayload, QuestionnairePayload, SectionPayload};
use crate::vocabulary::to_stored;

/// Longest description written for an information block.
pub const MAX_INFORMATION_DESCRIPTION_LEN: usize = 500;

/// Settings key holding the id other questions' conditions refer to.
pub const QUESTION_KEY: &str = "questionKey";

/// Prefix of keys given to questions the backend has not stored yet.
pub const LOCAL_KEY_PREFIX: &str = "local-";

/// Build the `PUT` payload for a questionnaire.
pub fn serialize(tree: &Questionnaire) -> QuestionnairePayload {
    let meta = tree.meta();
    QuestionnairePayload {
        id: None,
        program_id: meta.program_id.clone(),
        title: meta.title.clone(),
        description: meta.description.clone(),
        status: meta.status,
        kind: meta.kind.clone(),
        languages: meta.languages.clone(),
        settings: to_object(tree.settings()),
        sections: tree
            .sections()
            .enumerate()
            .map(|(index, section)| serialize_section(tree, index, section))
            .collect(),
        attributes: meta.attributes.clone(),
    }
}

/// Serialize straight to a JSON string.
pub fn to_json(tree: &Questionnaire) -> Result<String, serde_json::Error> {
    serde_json::to_string(&serialize(tree))
}

/// The key a question is referred to by in the payload: its backend id once
/// it has one, otherwise `local-<id>`.
///
/// Local ids restart at 1 in every process, so they are kept out of the
/// numeric range backend ids live in.
pub fn question_key(question: &Question) -> RemoteId {
    question
        .remote_id()
        .cloned()
        .unwrap_or_else(|| RemoteId::Str(format!("{LOCAL_KEY_PREFIX}{}", question.id())))
}

fn serialize_section(tree: &Questionnaire, index: usize, section: &Section) -> SectionPayload {
    SectionPayload {
        id: section.remote_id().cloned(),
        title: section.title().to_string(),
        description: section.description().to_string(),
        order: Some(index as i64 + 1),
        questions: tree
            .questions_in(section.id())
            .enumerate()
            .map(|(index, question)| serialize_question(tree, index, question))
            .collect(),
        attributes: section.attributes().clone(),
    }
}

fn serialize_question(tree: &Questionnaire, index: usize, question: &Question) -> QuestionPayload {
    let (title, truncated) = truncate(question.prompt(), MAX_TITLE_LEN);
    let description = match question.kind() {
        QuestionKind::Information(info) => truncate(&info.body, MAX_INFORMATION_DESCRIPTION_LEN).0,
        _ => question.description().to_string(),
    };
    let options = question
        .kind()
        .options()
        .map(|options| options.iter().cloned().map(Value::String).collect());
    let translations = if question.translations().is_empty() {
        None
    } else {
        Some(question.translations().clone())
    };

    QuestionPayload {
        id: question.remote_id().cloned(),
        question_type: to_stored(question.question_type()).to_string(),
        title,
        formatted_title: truncated.then(|| question.prompt().to_string()),
        description,
        is_required: question.is_required(),
        options,
        settings: question_settings(tree, question),
        order: Some(index as i64 + 1),
        translations,
        attributes: question.attributes().clone(),
    }
}

/// Unknown keys first, then the typed payload, then the shared scalar fields.
fn question_settings(tree: &Questionnaire, question: &Question) -> Map<String, Value> {
    let mut settings = question.extra().clone();

    match question.kind() {
        QuestionKind::MultipleChoice(choice) | QuestionKind::MultiSelect(choice) => {
            if !choice.correct_answers.is_empty() {
                settings.insert("correctAnswers".into(), json!(choice.correct_answers));
            }
        }
        QuestionKind::Text(text) => {
            if !text.placeholder.is_empty() {
                settings.insert("placeholder".into(), json!(text.placeholder));
            }
        }
        QuestionKind::Slider(slider) => {
            settings.insert("min".into(), json!(slider.min));
            settings.insert("max".into(), json!(slider.max));
        }
        QuestionKind::Rating(rating) => {
            settings.insert("scale".into(), json!(rating.scale));
        }
        QuestionKind::Matrix(matrix) => {
            settings.insert("rows".into(), json!(matrix.rows));
            settings.insert("columns".into(), json!(matrix.columns));
        }
        QuestionKind::Information(info) => {
            settings.insert("formattedContent".into(), json!(info.body));
            settings.insert("hyperlinks".into(), json!(info.hyperlinks));
            settings.insert("hyperlinksPosition".into(), json!(info.position));
        }
        QuestionKind::SliderScale(s) => settings.extend(to_object(s)),
        QuestionKind::DialGauge(s) => settings.extend(to_object(s)),
        QuestionKind::LikertVisual(s) => settings.extend(to_object(s)),
        QuestionKind::Nps(s) => settings.extend(to_object(s)),
        QuestionKind::StarRating(s) => settings.extend(to_object(s)),
        QuestionKind::DragAndDrop(s) => settings.extend(to_object(s)),
        QuestionKind::SctLikert(sct) => settings.extend(to_object(&sct.settings)),
    }

    if let Some(url) = question.image_url() {
        settings.insert("imageUrl".into(), json!(url));
    }
    if let Some(logic) = question.conditional_logic() {
        settings.insert("conditionalLogic".into(), logic_to_value(tree, logic));
    }
    settings.insert(QUESTION_KEY.into(), json!(question_key(question)));
    settings
}

/// Conditions pointing at questions no longer in the tree are left out.
fn logic_to_value(tree: &Questionnaire, logic: &ConditionalLogic) -> Value {
    let conditions: Vec<Value> = logic
        .conditions
        .iter()
        .filter_map(|condition| {
            let target = tree.question(condition.question)?;
            let mut entry = Map::new();
            entry.insert("questionId".into(), json!(question_key(target)));
            entry.insert("operator".into(), json!(condition.operator));
            if let Some(value) = &condition.value {
                entry.insert("value".into(), value.clone());
            }
            Some(Value::Object(entry))
        })
        .collect();

    json!({
        "enabled": logic.enabled,
        "action": logic.action,
        "logicType": logic.combinator,
        "conditions": conditions,
    })
}

fn to_object<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!("expected a JSON object, got {other}");
            Map::new()
        }
        Err(err) => {
            warn!("failed to serialize settings: {err}");
            Map::new()
        }
    }
}

/// Cut `s` to at most `max` characters. Returns whether anything was cut.
pub(crate) fn truncate(s: &str, max: usize) -> (String, bool) {
    match s.char_indices().nth(max) {
        Some((byte, _)) => (s[..byte].to_string(), true),
        None => (s.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use questionnaire_types::{QuestionField, QuestionId, QuestionType, SectionId};

    fn single(ty: QuestionType) -> (Questionnaire, SectionId, QuestionId) {
        let tree = Questionnaire::new();
        let section = tree.section_ids().next().unwrap();
        let (tree, question) = tree.add_question(section, ty);
        (tree, section, question.unwrap())
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("héllo", 3), ("hél".to_string(), true));
        assert_eq!(truncate("abc", 3), ("abc".to_string(), false));
    }

    #[test]
    fn test_type_tags_are_mapped() {
        let (tree, _, _) = single(QuestionType::MultipleChoice);
        let payload = serialize(&tree);
        assert_eq!(payload.sections[0].questions[0].question_type, "radio");
    }

    #[test]
    fn test_long_prompt_is_truncated_and_kept_in_formatted_title() {
        let (tree, section, question) = single(QuestionType::Text);
        let prompt = "q".repeat(300);
        let tree =
            tree.update_question_field(section, question, QuestionField::Prompt(prompt.clone()));
        let payload = serialize(&tree);
        let q = &payload.sections[0].questions[0];
        assert_eq!(q.title.chars().count(), 255);
        assert_eq!(q.formatted_title.as_deref(), Some(prompt.as_str()));
    }

    #[test]
    fn test_information_block_folds_body_into_settings() {
        let (tree, section, question) = single(QuestionType::Information);
        let body = "b".repeat(600);
        let tree = tree.update_question_field(section, question, QuestionField::Body(body.clone()));
        let payload = serialize(&tree);
        let q = &payload.sections[0].questions[0];

        assert_eq!(q.question_type, "information");
        assert_eq!(q.title, "Information Block");
        assert_eq!(q.description.chars().count(), MAX_INFORMATION_DESCRIPTION_LEN);
        assert_eq!(q.settings["formattedContent"], json!(body));
        assert_eq!(q.settings["hyperlinksPosition"], json!("bottom"));
        assert_eq!(q.options, None);
    }

    #[test]
    fn test_scalar_fields_land_in_settings() {
        let (tree, section, question) = single(QuestionType::Slider);
        let tree = tree.update_question_field(
            section,
            question,
            QuestionField::ImageUrl(Some("https://cdn.example/a.png".into())),
        );
        let q = &serialize(&tree).sections[0].questions[0];
        assert_eq!(q.question_type, "scale");
        assert_eq!(q.settings["min"], json!(0));
        assert_eq!(q.settings["max"], json!(100));
        assert_eq!(q.settings["imageUrl"], json!("https://cdn.example/a.png"));
    }

    #[test]
    fn test_new_records_have_no_id() {
        let (tree, _, question) = single(QuestionType::Nps);
        let payload = serialize(&tree);
        assert_eq!(payload.sections[0].id, None);
        let q = &payload.sections[0].questions[0];
        assert_eq!(q.id, None);
        assert_eq!(q.settings[QUESTION_KEY], json!(format!("local-{}", question.get())));
    }

    #[test]
    fn test_local_keys_do_not_collide_with_record_ids() {
        let (tree, _, fresh) = single(QuestionType::Text);
        let stored = Question::with_defaults(QuestionType::Text)
            .with_remote_id(Some(RemoteId::Int(fresh.get() as i64)));
        let tree = tree.with_section(Section::new("Stored"), vec![stored]);

        let keys: Vec<Value> = serialize(&tree)
            .sections
            .iter()
            .flat_map(|s| &s.questions)
            .map(|q| q.settings[QUESTION_KEY].clone())
            .collect();
        assert_eq!(keys.len(), 2);
        assert_ne!(keys[0], keys[1]);
        assert_eq!(keys[1], json!(fresh.get()));
    }
}
