use crate::Questionnaire;

/// Default number of snapshots kept by [`History`].
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Undo/redo stack of questionnaire snapshots.
///
/// Snapshots share structure with each other, so keeping many of them costs
/// little more than the records that actually changed between them.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Questionnaire>,
    index: usize,
    limit: usize,
}

impl History {
    pub fn new(initial: Questionnaire) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Keep at most `limit` snapshots (at least one).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self.trim();
        self
    }

    pub fn current(&self) -> &Questionnaire {
        &self.entries[self.index]
    }

    /// Record a new state. Discards anything that could have been redone.
    ///
    /// Returns `false` if `next` equals the current state and nothing was
    /// recorded.
    pub fn commit(&mut self, next: Questionnaire) -> bool {
        if &next == self.current() {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(next);
        self.index = self.entries.len() - 1;
        self.trim();
        true
    }

    /// Step back one state. Returns the now-current state, or `None` at the
    /// oldest state.
    pub fn undo(&mut self) -> Option<&Questionnaire> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    /// Step forward one state. Returns the now-current state, or `None` when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> Option<&Questionnaire> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Number of stored snapshots, including the current one.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn trim(&mut self) {
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
            self.index = self.index.saturating_sub(excess);
        }
    }
}
