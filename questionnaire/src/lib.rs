//! Questionnaire builder state model.
//!
//! Re-exports the tree and wire crates and adds the pieces that tie them to a
//! backend:
//! - `Session` - An editing session with undo history, dirty tracking and save
//! - `MemoryStore` - A `QuestionnaireStore` kept in memory, for tests and demos
//!
//! ```rust,ignore
//! use questionnaire::{Edit, MemoryStore, QuestionType, RemoteId, Session};
//!
//! let store = MemoryStore::new().with_questionnaire(7i64, payload);
//! let mut session = Session::open(store, RemoteId::Int(7)).await?;
//! let section = session.current().section_ids().next().unwrap();
//! session.apply(Edit::AddQuestion { section, ty: QuestionType::Nps });
//! session.save().await?;
//! ```

pub use questionnaire_types::*;
pub use questionnaire_wire::*;

mod memory_store;
pub use memory_store::MemoryStore;

mod session;
pub use session::{Session, SessionError};
