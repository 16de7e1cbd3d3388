//! The JSON shapes exchanged with `GET`/`PUT /questionnaires/{id}`.

use std::collections::BTreeMap;

use questionnaire_types::{QuestionnaireKind, RemoteId, Status, Translation};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A whole questionnaire as the backend stores it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionnairePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RemoteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: QuestionnaireKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<SectionPayload>,
    /// Any other top-level key.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RemoteId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<QuestionPayload>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RemoteId>,
    /// Stored type tag, e.g. `radio` or `slider_scale`.
    #[serde(rename = "type")]
    pub question_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Full prompt, sent when `title` had to be shortened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_required: bool,
    /// Option labels. Other editors sometimes store objects here.
    #[serde(default)]
    pub options: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations: Option<BTreeMap<String, Translation>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Accept both a bare questionnaire and one wrapped as `{"data": ...}`.
pub fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nulls_become_defaults() {
        let payload: QuestionnairePayload = serde_json::from_value(json!({
            "title": "Pulse",
            "description": null,
            "languages": null,
            "settings": null,
            "sections": [{ "title": "A", "description": null, "questions": null }],
        }))
        .unwrap();
        assert_eq!(payload.description, "");
        assert!(payload.languages.is_empty());
        assert!(payload.sections[0].questions.is_empty());
    }

    #[test]
    fn test_unknown_top_level_keys_are_kept() {
        let payload: QuestionPayload = serde_json::from_value(json!({
            "type": "radio",
            "title": "Pick",
            "is_comment_enabled": true,
        }))
        .unwrap();
        assert_eq!(payload.attributes.get("is_comment_enabled"), Some(&json!(true)));
        assert!(!payload.attributes.contains_key("type"));
    }

    #[test]
    fn test_unwrap_data() {
        let wrapped = json!({ "message": "ok", "data": { "title": "T" } });
        assert_eq!(unwrap_data(wrapped), json!({ "title": "T" }));
        assert_eq!(unwrap_data(json!({ "title": "T" })), json!({ "title": "T" }));
    }
}
