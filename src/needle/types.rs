use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Needle collection. Fields Needle adds beyond `id` and `name` are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A file stored in a collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionFile {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A file to be fetched by Needle from a public URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileToAdd {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateCollectionRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AddFilesRequest<'a> {
    pub files: &'a [FileToAdd],
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub text: &'a str,
}

/// Pull the payload out of Needle's `{"result": ...}` envelope.
/// Bodies without the envelope are returned as they are.
pub(crate) fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Best-effort extraction of the provider's error message from a failure body
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let candidates = [
            value.pointer("/error/message"),
            value.get("error"),
            value.get("message"),
            value.get("detail"),
        ];
        for candidate in candidates.into_iter().flatten() {
            if let Some(text) = candidate.as_str() {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error message returned".to_string()
    } else {
        trimmed.to_string()
    }
}
