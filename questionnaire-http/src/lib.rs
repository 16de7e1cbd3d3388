//! HTTP backend for the questionnaire builder.
//!
//! `HttpStore` implements `QuestionnaireStore` against the REST API:
//! - `GET /questionnaires/{id}` to open a questionnaire
//! - `PUT /questionnaires/{id}` to replace it on save
//!
//! Responses are classified by [`classify_response`], which is independent
//! of the transport and tested on its own.

mod client;
pub use client::{DEFAULT_TIMEOUT, HttpStore, HttpStoreError};

mod response;
pub use response::classify_response;
