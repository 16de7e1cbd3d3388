use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Draw the next value from the process-wide id sequence.
///
/// Sections and questions share one counter, so an id is never handed out
/// twice during the lifetime of the process.
fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Local identifier of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionId(u64);

impl SectionId {
    /// Allocate a fresh section id.
    pub fn fresh() -> Self {
        Self(next_id())
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local identifier of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuestionId(u64);

impl QuestionId {
    /// Allocate a fresh question id.
    pub fn fresh() -> Self {
        Self(next_id())
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned by the backend once an entity has been persisted.
///
/// The backend hands out integers, but older payloads sometimes carry
/// string ids, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Int(i64),
    Str(String),
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RemoteId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for RemoteId {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_never_repeat() {
        let a = SectionId::fresh();
        let b = QuestionId::fresh();
        let c = SectionId::fresh();
        assert!(a.get() < b.get());
        assert!(b.get() < c.get());
    }

    #[test]
    fn test_remote_id_accepts_numbers_and_strings() {
        let int: RemoteId = serde_json::from_str("42").unwrap();
        let string: RemoteId = serde_json::from_str("\"q-7\"").unwrap();
        assert_eq!(int, RemoteId::Int(42));
        assert_eq!(string, RemoteId::from("q-7"));
        assert_eq!(int.to_string(), "42");
    }
}
