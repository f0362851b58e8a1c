//! Request and response envelopes.
//!
//! Every API call except file uploads is a single POST of an [`Envelope`] to
//! the API endpoint. The envelope names the application namespace, the verb
//! (`actionId`), and optionally the target object id, an operation payload,
//! and pagination options:
//!
//! ```json
//! {
//!   "namespace": "NTreeNotes",
//!   "actionId": "find",
//!   "object": { "text": "foo", "tags": ["work"] },
//!   "options": { "offset": 0, "countMax": 20 }
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Operation verb carried in `actionId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Find,
}

impl Action {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Find => "find",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of an operation: a single id or a list of ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectId {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        ObjectId::One(id.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        ObjectId::One(id)
    }
}

impl From<Vec<String>> for ObjectId {
    fn from(ids: Vec<String>) -> Self {
        ObjectId::Many(ids)
    }
}

/// Pagination options sent with list reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// Number of results to skip.
    pub offset: usize,
    /// Maximum number of results to return.
    pub count_max: usize,
}

impl Paging {
    /// Default page size for note searches.
    pub const DEFAULT_COUNT_MAX: usize = 20;

    pub fn new(offset: usize, count_max: usize) -> Self {
        Self { offset, count_max }
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_COUNT_MAX)
    }
}

/// A single request envelope. One envelope carries exactly one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub namespace: String,
    pub action_id: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Paging>,
}

impl Envelope {
    /// Create an envelope with no target, payload, or options.
    pub fn new(namespace: impl Into<String>, action: Action) -> Self {
        Self {
            namespace: namespace.into(),
            action_id: action,
            object_id: None,
            object: None,
            options: None,
        }
    }

    /// Set the target object id.
    pub fn with_object_id(mut self, id: impl Into<ObjectId>) -> Self {
        self.object_id = Some(id.into());
        self
    }

    /// Set the operation payload.
    pub fn with_object<O: Serialize>(mut self, object: &O) -> Result<Self> {
        self.object = Some(serde_json::to_value(object)?);
        Ok(self)
    }

    /// Set pagination options.
    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.options = Some(paging);
        self
    }
}

/// `object` field of a response, which the server sends as a single value or
/// a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Response envelope for reads and finds.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEnvelope<T> {
    pub object: Option<OneOrMany<T>>,
}

impl<T> ObjectEnvelope<T> {
    /// All returned objects; a missing or null `object` yields an empty list.
    pub fn into_vec(self) -> Vec<T> {
        self.object.map(OneOrMany::into_vec).unwrap_or_default()
    }
}

/// How a response's `ok` flag is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessCheck {
    /// Any truthy JSON value counts as success.
    Truthy,
    /// Only the literal `true` counts as success.
    Strict,
}

impl SuccessCheck {
    pub fn passes(&self, ok: Option<&Value>) -> bool {
        match (self, ok) {
            (_, None) => false,
            (SuccessCheck::Strict, Some(value)) => value == &Value::Bool(true),
            (SuccessCheck::Truthy, Some(value)) => is_truthy(value),
        }
    }
}

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Write acknowledgement whose `ok` flag is always present.
///
/// A body that passes its [`SuccessCheck`] is kept untouched. Any other body
/// gets `"ok": false` written into it; a body that is not a JSON object is
/// replaced by `{"ok": false}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgement {
    pub ok: bool,
    pub body: Map<String, Value>,
}

impl Acknowledgement {
    pub fn from_body(body: Value, check: SuccessCheck) -> Self {
        let mut body = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        if check.passes(body.get("ok")) {
            return Self { ok: true, body };
        }

        tracing::debug!(ok = ?body.get("ok"), "Normalizing missing or falsy ok flag to false");
        body.insert("ok".to_string(), Value::Bool(false));
        Self { ok: false, body }
    }

    /// Look up a field of the response body.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// The full response body as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }
}
