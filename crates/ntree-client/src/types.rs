//! Request and response types for the NTree notes API.
//!
//! These types mirror the server's object model. Notes, tags and files are
//! owned by the server; the client only holds transient copies.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::envelope::Paging;

// ─────────────────────────────────────────────────────────────────────────────
// Notes
// ─────────────────────────────────────────────────────────────────────────────

/// A note as returned by the server.
///
/// Fields without a typed counterpart are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Note ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Note title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Note body.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Tag references.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Image URL. Absolute after a search, empty when the note has no image.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    /// IDs of attached files.
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<String>,
    /// Any other fields of the note.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Search parameters for listing notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindNotesQuery {
    /// Full-text filter.
    pub text: String,
    /// Tags the notes must carry.
    pub tags: Vec<String>,
    /// Pagination (offset 0, 20 results by default).
    pub paging: Paging,
}

impl FindNotesQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_paging(mut self, offset: usize, count_max: usize) -> Self {
        self.paging = Paging::new(offset, count_max);
        self
    }
}

/// Fields for creating a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub text: String,
    /// May be empty.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Full replacement of a note's fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

impl From<Note> for NoteUpdate {
    fn from(note: Note) -> Self {
        Self {
            title: note.title,
            text: note.text,
            tags: note.tags,
            files: note.files,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tags
// ─────────────────────────────────────────────────────────────────────────────

/// A tag as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag ID.
    pub id: String,
    /// Tag label.
    #[serde(default, alias = "text", deserialize_with = "null_as_default")]
    pub title: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Write results
// ─────────────────────────────────────────────────────────────────────────────

/// Raw result of a create, update or delete, passed through as the server
/// sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    /// ID of the created object, when the server reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Success flag exactly as sent, of whatever JSON type; `None` when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<Value>,
    /// Any other fields of the response.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WriteResult {
    /// True only when the server sent `"ok": true`.
    pub fn is_ok(&self) -> bool {
        self.ok == Some(Value::Bool(true))
    }
}

/// Result of a raw file upload.
///
/// Only `fileId` is typed; `id`, `objectId` and anything else the server
/// sends stay in `extra`. Use [`UploadResult::assigned_id`] to read the ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// `fileId` as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Success flag exactly as sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UploadResult {
    /// Server-assigned file ID: the first string among `fileId`, `id` and
    /// `objectId`.
    pub fn assigned_id(&self) -> Option<&str> {
        self.file_id.as_deref().or_else(|| {
            ["id", "objectId"]
                .iter()
                .find_map(|key| self.extra.get(*key).and_then(Value::as_str))
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
