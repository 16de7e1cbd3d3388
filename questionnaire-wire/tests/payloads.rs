use pretty_assertions::assert_eq;
use questionnaire_types::{
    LogicAction, Operator, QuestionKind, QuestionType, RemoteId, SectionHeaderFormat, Status,
};
use questionnaire_wire::{LoadError, from_json, load_value, serialize, to_json};
use serde_json::{Value, json};

const SHOW_RESPONSE: &str = include_str!("fixtures/show_response.json");

#[test]
fn test_show_response_loads() {
    let tree = from_json(SHOW_RESPONSE).unwrap();

    let meta = tree.meta();
    assert_eq!(meta.title, "Onboarding pulse");
    assert_eq!(meta.description, "");
    assert_eq!(meta.status, Status::Published);
    assert_eq!(meta.languages, ["en", "de"]);
    assert_eq!(
        meta.program_id.as_deref(),
        Some("b7e1c9d2-0f4a-4c1e-9a53-6d2f8e4b1a07")
    );
    assert!(!tree.settings().show_progress_bar);
    assert_eq!(
        tree.settings().section_header_format,
        SectionHeaderFormat::TitleOnly
    );
    assert_eq!(tree.settings().extra.get("display_mode"), Some(&json!("paged")));

    let titles: Vec<_> = tree.sections().map(|s| s.title().to_string()).collect();
    assert_eq!(titles, ["About you", "Feedback"]);

    let types: Vec<_> = tree.all_questions().map(|q| q.question_type()).collect();
    assert_eq!(
        types,
        [
            QuestionType::MultipleChoice,
            QuestionType::Text,
            QuestionType::Slider,
            QuestionType::Text,
        ]
    );
}

#[test]
fn test_conditions_point_at_loaded_questions() {
    let tree = from_json(SHOW_RESPONSE).unwrap();
    let questions: Vec<_> = tree.all_questions().collect();
    let logic = questions[1].conditional_logic().unwrap();

    assert_eq!(logic.action, LogicAction::Show);
    assert_eq!(logic.conditions.len(), 1);
    assert_eq!(logic.conditions[0].question, questions[0].id());
    assert_eq!(logic.conditions[0].operator, Operator::Equals);
    assert_eq!(logic.conditions[0].value, Some(json!("No")));
}

#[test]
fn test_save_payload_keeps_ids_and_unknown_keys() {
    let tree = from_json(SHOW_RESPONSE).unwrap();
    let payload = serde_json::to_value(serialize(&tree)).unwrap();

    assert_eq!(payload.get("id"), None);
    assert_eq!(payload["scheduled_start"], json!("2024-05-01T09:00:00Z"));
    for key in ["created_at", "updated_at", "program"] {
        assert_eq!(payload.get(key), None, "{key} should not be sent back");
    }
    assert_eq!(payload["settings"]["display_mode"], json!("paged"));

    let section = &payload["sections"][0];
    assert_eq!(section["id"], json!(11));
    assert_eq!(section["order"], json!(1));
    assert_eq!(section.get("questionnaire_id"), None);

    let radio = &section["questions"][0];
    assert_eq!(radio["id"], json!(21));
    assert_eq!(radio["type"], json!("radio"));
    assert_eq!(radio["is_comment_enabled"], json!(true));
    assert_eq!(radio["references"], json!([]));
    assert_eq!(radio.get("section_id"), None);
    assert_eq!(radio["settings"]["layout"], json!("inline"));
    assert_eq!(radio["settings"]["correctAnswers"], json!([0]));
    assert_eq!(radio["settings"]["questionKey"], json!(21));
    assert_eq!(
        radio["translations"]["de"]["options"],
        json!(["Ja", "Nein"])
    );

    let follow_up = &section["questions"][1];
    assert_eq!(
        follow_up["settings"]["conditionalLogic"]["conditions"][0]["questionId"],
        json!(21)
    );

    let scale = &section["questions"][2];
    assert_eq!(scale["type"], json!("scale"));
    assert_eq!(scale["settings"]["min"], json!(1));
    assert_eq!(scale["settings"]["max"], json!(10));
}

#[test]
fn test_reload_of_saved_payload_is_stable() {
    let tree = from_json(SHOW_RESPONSE).unwrap();
    let saved = to_json(&tree).unwrap();
    let reloaded = from_json(&saved).unwrap();

    assert!(tree.structurally_eq(&reloaded));
    assert_eq!(saved, to_json(&reloaded).unwrap());
}

#[test]
fn test_remote_ids_survive_a_reload() {
    let tree = from_json(SHOW_RESPONSE).unwrap();
    let remote: Vec<_> = tree.all_questions().map(|q| q.remote_id().cloned()).collect();
    assert_eq!(
        remote,
        [21, 22, 23, 31].map(|id| Some(RemoteId::Int(id)))
    );
}

#[test]
fn test_unsupported_tag_reports_its_path() {
    let mut body: Value = serde_json::from_str(SHOW_RESPONSE).unwrap();
    body["data"]["sections"][1]["questions"][2]["type"] = json!("percentage_allocation");

    match load_value(body) {
        Err(LoadError::UnknownQuestionType { path, tag }) => {
            assert_eq!(tag, "percentage_allocation");
            assert_eq!(path, "sections.0.questions.2");
        }
        other => panic!("expected an unknown type error, got {other:?}"),
    }
}

#[test]
fn test_invalid_typed_settings_are_reported() {
    let err = load_value(json!({
        "title": "Broken",
        "sections": [{ "title": "A", "questions": [
            { "type": "nps", "title": "Recommend?", "settings": { "showCategories": "sometimes" } },
        ]}],
    }))
    .unwrap_err();
    assert!(matches!(err, LoadError::InvalidSettings { ref path, .. } if path == "sections.0.questions.0.settings"));
}

#[test]
fn test_information_block_round_trip() {
    let tree = load_value(json!({
        "title": "Info",
        "sections": [{ "title": "A", "questions": [{
            "type": "information",
            "title": "Information Block",
            "description": "short",
            "settings": {
                "formattedContent": "<p>Full body</p>",
                "hyperlinks": [{ "text": "Guide", "url": "https://example.org/guide" }],
                "hyperlinksPosition": "top",
            },
        }]}],
    }))
    .unwrap();

    let question = tree.all_questions().next().unwrap();
    let QuestionKind::Information(info) = question.kind() else {
        panic!("expected an information block");
    };
    assert_eq!(info.body, "<p>Full body</p>");
    assert_eq!(info.hyperlinks[0].url, "https://example.org/guide");

    let payload = serialize(&tree);
    let saved = &payload.sections[0].questions[0];
    assert_eq!(saved.description, "<p>Full body</p>");
    assert_eq!(saved.settings["hyperlinksPosition"], json!("top"));
}
