//! Wire format of the questionnaire builder.
//!
//! This crate converts between the in-memory [`Questionnaire`] and the JSON
//! payload of `GET`/`PUT /questionnaires/{id}`:
//! - `serialize` / `to_json` - Tree to payload, deterministic
//! - `load` / `load_value` / `from_json` - Payload to tree with fresh ids
//! - `to_stored` / `from_stored` - The type tag vocabulary
//! - `QuestionnaireStore` - The async contract a backend implements
//!
//! [`Questionnaire`]: questionnaire_types::Questionnaire

mod error;
pub use error::LoadError;

mod payload;
pub use payload::{QuestionPayload, QuestionnairePayload, SectionPayload, unwrap_data};

mod vocabulary;
pub use vocabulary::{STORED_TYPES, from_stored, to_stored};

mod serialize;
pub use serialize::{
    LOCAL_KEY_PREFIX, MAX_INFORMATION_DESCRIPTION_LEN, QUESTION_KEY, question_key, serialize,
    to_json,
};

mod load;
pub use load::{SERVER_MANAGED_KEYS, from_json, load, load_value};

mod store;
pub use store::{QuestionnaireStore, StoreError};
