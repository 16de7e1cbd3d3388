//! An editing session: one questionnaire, its undo history and a store to
//! save it to.

use log::{debug, info};
use questionnaire_types::{Edit, History, Questionnaire, RemoteId, ValidationErrors};
use questionnaire_wire::{
    LoadError, QuestionnairePayload, QuestionnaireStore, StoreError, load, serialize,
};

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Could not load questionnaire: {0}")]
    Load(#[from] LoadError),

    /// Local checks failed; nothing was sent.
    #[error("Questionnaire is not ready to save: {0}")]
    Invalid(ValidationErrors),

    #[error("Could not encode questionnaire: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Editing state of one stored questionnaire.
///
/// Edits go through [`Session::apply`] (or [`Session::commit`] when the
/// caller built the next tree itself) and land in the undo history. The
/// session is dirty whenever the current tree would serialize differently
/// from what was last loaded or saved.
#[derive(Debug)]
pub struct Session<S> {
    store: S,
    id: RemoteId,
    history: History,
    saved_digest: Option<md5::Digest>,
}

impl<S: QuestionnaireStore> Session<S> {
    /// Fetch questionnaire `id` from `store` and start editing it.
    pub async fn open(store: S, id: RemoteId) -> Result<Self, SessionError> {
        let payload = store.fetch(&id).await?;
        let tree = load(&payload)?;
        info!(
            "opened questionnaire {id}: {} sections, {} questions",
            tree.section_count(),
            tree.question_count()
        );
        let saved_digest = Some(digest(&tree)?);
        Ok(Self {
            store,
            id,
            history: History::new(tree),
            saved_digest,
        })
    }

    /// Start editing a tree that was never saved under `id`.
    pub fn draft(store: S, id: RemoteId, tree: Questionnaire) -> Self {
        Self {
            store,
            id,
            history: History::new(tree),
            saved_digest: None,
        }
    }

    /// Keep at most `limit` snapshots of undo history.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = self.history.with_limit(limit);
        self
    }

    pub fn id(&self) -> &RemoteId {
        &self.id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current(&self) -> &Questionnaire {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Apply an edit. Returns `false` if it left the tree unchanged.
    pub fn apply(&mut self, edit: Edit) -> bool {
        let next = self.current().apply(edit);
        self.commit(next)
    }

    /// Record `next` as the new current tree. Returns `false` if it equals
    /// the current one.
    pub fn commit(&mut self, next: Questionnaire) -> bool {
        self.history.commit(next)
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo().is_some()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo().is_some()
    }

    /// Whether the current tree differs from the last loaded or saved one.
    pub fn is_dirty(&self) -> bool {
        match (&self.saved_digest, digest(self.current())) {
            (Some(saved), Ok(current)) => *saved != current,
            _ => true,
        }
    }

    /// Validate, serialize and store the current tree.
    ///
    /// On failure the tree, the history and the dirty state are unchanged.
    /// The tree is not reloaded from the response, so local ids stay valid
    /// across saves.
    pub async fn save(&mut self) -> Result<QuestionnairePayload, SessionError> {
        let tree = self.history.current();
        tree.validate().map_err(SessionError::Invalid)?;

        let payload = serialize(tree);
        let sent = md5::compute(serde_json::to_vec(&payload)?);
        debug!("saving questionnaire {} ({:x})", self.id, sent);

        let stored = self.store.save(&self.id, &payload).await?;
        self.saved_digest = Some(sent);
        info!("saved questionnaire {}", self.id);
        Ok(stored)
    }
}

fn digest(tree: &Questionnaire) -> Result<md5::Digest, serde_json::Error> {
    Ok(md5::compute(serde_json::to_vec(&serialize(tree))?))
}
