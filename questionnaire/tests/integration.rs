//! Integration tests for the questionnaire builder

use pretty_assertions::assert_eq;
use questionnaire::{
    Condition, ConditionalLogic, Edit, MemoryStore, MetaField, Operator, QuestionField,
    QuestionKind, QuestionType, Questionnaire, QuestionnairePayload, RemoteId, SectionField,
    Session, SessionError, StoreError, load, serialize,
};
use serde_json::json;

const PROGRAM: &str = "b7e1c9d2-0f4a-4c1e-9a53-6d2f8e4b1a07";

fn ready() -> Questionnaire {
    Questionnaire::new()
        .update_meta(MetaField::Title("Onboarding".into()))
        .update_meta(MetaField::ProgramId(Some(PROGRAM.into())))
}

fn seeded_store() -> MemoryStore {
    MemoryStore::new().with_questionnaire(5i64, serialize(&ready()))
}

fn first_section(tree: &Questionnaire) -> questionnaire::SectionId {
    tree.section_ids().next().unwrap()
}

#[test]
fn test_matrix_is_seeded_with_defaults() {
    let tree = Questionnaire::new();
    let section = first_section(&tree);
    let (tree, question) = tree.add_question(section, QuestionType::Matrix);

    let QuestionKind::Matrix(matrix) = tree.question(question.unwrap()).unwrap().kind() else {
        panic!("expected a matrix question");
    };
    assert_eq!(matrix.rows, ["Row 1", "Row 2"]);
    assert_eq!(matrix.columns, ["Column 1", "Column 2", "Column 3"]);
}

#[test]
fn test_correct_answer_toggles() {
    let tree = Questionnaire::new();
    let section = first_section(&tree);
    let (tree, single) = tree.add_question(section, QuestionType::MultipleChoice);
    let (tree, multi) = tree.add_question(section, QuestionType::MultiSelect);
    let (single, multi) = (single.unwrap(), multi.unwrap());

    let tree = tree
        .toggle_correct_answer(section, single, 1)
        .toggle_correct_answer(section, single, 2)
        .toggle_correct_answer(section, multi, 1)
        .toggle_correct_answer(section, multi, 2);

    assert_eq!(tree.question(single).unwrap().kind().correct_answers(), Some(&[2][..]));
    assert_eq!(tree.question(multi).unwrap().kind().correct_answers(), Some(&[1, 2][..]));
}

#[test]
fn test_option_removal_keeps_correct_indices() {
    let tree = Questionnaire::new();
    let section = first_section(&tree);
    let (tree, question) = tree.add_question(section, QuestionType::MultipleChoice);
    let question = question.unwrap();

    let tree = tree
        .toggle_correct_answer(section, question, 2)
        .remove_question_option(section, question, 0);

    let kind = tree.question(question).unwrap().kind();
    assert_eq!(kind.options(), Some(&["Option 2".to_string(), "Option 3".to_string()][..]));
    assert_eq!(kind.correct_answers(), Some(&[2][..]));
}

#[test]
fn test_unknown_settings_survive_an_edit_and_save() {
    let payload: QuestionnairePayload = serde_json::from_value(json!({
        "title": "Legacy",
        "program_id": PROGRAM,
        "settings": { "display_mode": "paged" },
        "sections": [{ "title": "A", "questions": [
            { "id": 1, "type": "star_rating", "title": "Stars", "settings": { "glow": true } },
        ]}],
    }))
    .unwrap();
    let tree = load(&payload).unwrap();
    let question = tree.all_questions().next().unwrap().id();
    let section = tree.owner_of(question).unwrap();

    let tree = tree.update_question_field(section, question, QuestionField::Required(true));
    let saved = serde_json::to_value(serialize(&tree)).unwrap();

    assert_eq!(saved["settings"]["display_mode"], json!("paged"));
    assert_eq!(saved["sections"][0]["questions"][0]["settings"]["glow"], json!(true));
    assert_eq!(saved["sections"][0]["questions"][0]["is_required"], json!(true));
}

#[tokio::test]
async fn test_open_edit_save_reopen() {
    let mut session = Session::open(seeded_store(), RemoteId::Int(5)).await.unwrap();
    assert!(!session.is_dirty());

    let section = first_section(session.current());
    assert!(session.apply(Edit::UpdateSection {
        section,
        field: SectionField::Title("Welcome".into()),
    }));
    assert!(session.apply(Edit::AddQuestion {
        section,
        ty: QuestionType::Nps,
    }));
    assert!(session.apply(Edit::AddQuestion {
        section,
        ty: QuestionType::Text,
    }));
    assert!(session.is_dirty());

    let stored = session.save().await.unwrap();
    assert!(!session.is_dirty());
    assert_eq!(stored.sections[0].title, "Welcome");
    assert_eq!(stored.sections[0].questions.len(), 2);
    assert_eq!(stored.sections[0].questions[0].question_type, "nps");

    let edited = session.current().clone();
    let (store, id) = (session.store(), session.id().clone());
    let reopened = load(&store.get(&id).unwrap()).unwrap();
    assert!(edited.structurally_eq(&reopened));
}

#[tokio::test]
async fn test_conditions_survive_a_save() {
    let mut session = Session::open(seeded_store(), RemoteId::Int(5)).await.unwrap();
    let section = first_section(session.current());
    let (tree, source) = session.current().add_question(section, QuestionType::MultipleChoice);
    let (tree, target) = tree.add_question(section, QuestionType::Text);
    let (source, target) = (source.unwrap(), target.unwrap());
    let tree = tree.update_question_field(
        section,
        target,
        QuestionField::ConditionalLogic(Some(ConditionalLogic::show_when(vec![
            Condition::new(source, Operator::Equals, Some(json!("Option 1"))),
        ]))),
    );
    assert!(session.commit(tree));

    session.save().await.unwrap();
    let stored = session.store().get(&RemoteId::Int(5)).unwrap();
    let reopened = load(&stored).unwrap();

    let questions: Vec<_> = reopened.all_questions().collect();
    let logic = questions[1].conditional_logic().unwrap();
    assert_eq!(logic.conditions[0].question, questions[0].id());
}

#[tokio::test]
async fn test_undo_back_to_saved_state_is_clean() {
    let mut session = Session::open(seeded_store(), RemoteId::Int(5)).await.unwrap();
    assert!(session.apply(Edit::UpdateMeta(MetaField::Title("Renamed".into()))));
    assert!(session.is_dirty());
    assert!(session.undo());
    assert!(!session.is_dirty());
}

#[tokio::test]
async fn test_failed_save_changes_nothing() {
    let mut session = Session::open(seeded_store(), RemoteId::Int(5)).await.unwrap();
    assert!(session.apply(Edit::AddSection));
    let before = session.current().clone();

    session.store().fail_next_save(500, "Failed to update questionnaire");
    let err = session.save().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Store(StoreError::Server { status: 500, .. })
    ));

    assert_eq!(session.current(), &before);
    assert!(session.is_dirty());
    assert!(session.history().can_undo());
    assert_eq!(session.store().save_count(), 0);

    session.save().await.unwrap();
    assert!(!session.is_dirty());
}

#[tokio::test]
async fn test_invalid_tree_is_not_sent() {
    let mut session = Session::open(seeded_store(), RemoteId::Int(5)).await.unwrap();
    assert!(session.apply(Edit::UpdateMeta(MetaField::Title(String::new()))));

    match session.save().await {
        Err(SessionError::Invalid(errors)) => assert!(errors.contains("title")),
        other => panic!("expected local validation to fail, got {other:?}"),
    }
    assert_eq!(session.store().save_count(), 0);
}

#[tokio::test]
async fn test_opening_a_missing_questionnaire() {
    let err = Session::open(MemoryStore::new(), RemoteId::Int(404))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Store(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_draft_saves_under_its_id() {
    let store = MemoryStore::new().with_questionnaire("draft-1", QuestionnairePayload::default());
    let mut session = Session::draft(store, RemoteId::from("draft-1"), ready());
    assert!(session.is_dirty());

    session.save().await.unwrap();
    assert!(!session.is_dirty());
    assert_eq!(
        session.store().get(&RemoteId::from("draft-1")).unwrap().title,
        "Onboarding"
    );
}
