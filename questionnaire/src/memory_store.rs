//! In-memory store for testing sessions without a backend.
//!
//! `MemoryStore` behaves like the REST backend in the ways the builder can
//! observe: it rejects payloads the backend would reject, answers unknown ids
//! with `NotFound`, and recreates every section and question with new ids on
//! each save.
//!
//! # Example
//!
//! ```rust,ignore
//! use questionnaire::{MemoryStore, QuestionnairePayload, RemoteId, Session};
//!
//! let store = MemoryStore::new().with_questionnaire(1i64, QuestionnairePayload::default());
//! let session = Session::open(store, RemoteId::Int(1)).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, info};
use parking_lot::Mutex;
use questionnaire_types::{MAX_LANGUAGE_LEN, MAX_TITLE_LEN, RemoteId, ValidationErrors};
use questionnaire_wire::{QuestionnairePayload, QuestionnaireStore, STORED_TYPES, StoreError};

/// Message the backend sends with a 422 response.
const INVALID_MESSAGE: &str = "The given data was invalid.";

/// A store that keeps payloads in a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<RemoteId, QuestionnairePayload>,
    next_record_id: i64,
    saves: usize,
    fail_next_save: Option<(u16, String)>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a questionnaire under `id`.
    pub fn with_questionnaire(
        self,
        id: impl Into<RemoteId>,
        payload: QuestionnairePayload,
    ) -> Self {
        let id = id.into();
        {
            let mut inner = self.inner.lock();
            let stored = inner.persist(&id, payload);
            inner.records.insert(id, stored);
        }
        self
    }

    /// The payload currently stored under `id`.
    pub fn get(&self, id: &RemoteId) -> Option<QuestionnairePayload> {
        self.inner.lock().records.get(id).cloned()
    }

    /// Number of saves that were accepted.
    pub fn save_count(&self) -> usize {
        self.inner.lock().saves
    }

    /// Make the next save fail with a server error.
    pub fn fail_next_save(&self, status: u16, message: impl Into<String>) {
        self.inner.lock().fail_next_save = Some((status, message.into()));
    }
}

impl Inner {
    /// Assign fresh ids the way the backend recreates records.
    fn persist(&mut self, id: &RemoteId, mut payload: QuestionnairePayload) -> QuestionnairePayload {
        payload.id = Some(id.clone());
        for section in &mut payload.sections {
            self.next_record_id += 1;
            section.id = Some(RemoteId::Int(self.next_record_id));
            for question in &mut section.questions {
                self.next_record_id += 1;
                question.id = Some(RemoteId::Int(self.next_record_id));
            }
        }
        payload
    }
}

#[async_trait]
impl QuestionnaireStore for MemoryStore {
    async fn fetch(&self, id: &RemoteId) -> Result<QuestionnairePayload, StoreError> {
        debug!("fetching questionnaire {id} from memory");
        self.get(id).ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn save(
        &self,
        id: &RemoteId,
        payload: &QuestionnairePayload,
    ) -> Result<QuestionnairePayload, StoreError> {
        let mut inner = self.inner.lock();
        if let Some((status, message)) = inner.fail_next_save.take() {
            return Err(StoreError::Server { status, message });
        }
        if !inner.records.contains_key(id) {
            return Err(StoreError::NotFound(id.clone()));
        }
        check_payload(payload).map_err(|errors| StoreError::Validation {
            message: INVALID_MESSAGE.to_string(),
            errors,
        })?;

        let stored = inner.persist(id, payload.clone());
        inner.records.insert(id.clone(), stored.clone());
        inner.saves += 1;
        info!("stored questionnaire {id} in memory");
        Ok(stored)
    }
}

fn check_title(errors: &mut ValidationErrors, field: String, title: &str) {
    if title.is_empty() {
        errors.add(field, "The title field is required.");
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.add(
            field,
            format!("The title may not be greater than {MAX_TITLE_LEN} characters."),
        );
    }
}

/// The backend's `PUT` rules.
fn check_payload(payload: &QuestionnairePayload) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_title(&mut errors, "title".to_string(), &payload.title);

    if let Some(program) = &payload.program_id {
        if !is_uuid(program) {
            errors.add("program_id", "The program id must be a valid UUID.");
        }
    }
    for (i, language) in payload.languages.iter().enumerate() {
        if language.chars().count() > MAX_LANGUAGE_LEN {
            errors.add(
                format!("languages.{i}"),
                format!("The language may not be greater than {MAX_LANGUAGE_LEN} characters."),
            );
        }
    }

    for (s, section) in payload.sections.iter().enumerate() {
        check_title(&mut errors, format!("sections.{s}.title"), &section.title);
        for (q, question) in section.questions.iter().enumerate() {
            let prefix = format!("sections.{s}.questions.{q}");
            if !STORED_TYPES.contains(&question.question_type.as_str()) {
                errors.add(format!("{prefix}.type"), "The selected type is invalid.");
            }
            check_title(&mut errors, format!("{prefix}.title"), &question.title);
        }
    }

    errors.into_result()
}

fn is_uuid(s: &str) -> bool {
    s.len() == 36
        && s.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        })
}
