//! Notes API.

use serde::Serialize;

use crate::client::NTreeClient;
use crate::envelope::{Action, ObjectEnvelope};
use crate::error::{Error, Result};
use crate::types::{FindNotesQuery, NewNote, Note, NoteUpdate, WriteResult};

const NOTE_TYPE: &str = "note";

#[derive(Serialize)]
struct NoteFilter<'a> {
    text: &'a str,
    tags: &'a [String],
}

#[derive(Serialize)]
struct NotePayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
    text: &'a str,
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<&'a [String]>,
}

/// Notes API client.
pub struct NotesApi {
    client: NTreeClient,
}

impl NotesApi {
    pub(crate) fn new(client: NTreeClient) -> Self {
        Self { client }
    }

    /// Find notes matching a query.
    ///
    /// Image URLs in the result are absolute, or empty for notes without an
    /// image.
    pub async fn find(&self, query: FindNotesQuery) -> Result<Vec<Note>> {
        let envelope = self
            .client
            .envelope(Action::Find)
            .with_object(&NoteFilter {
                text: &query.text,
                tags: &query.tags,
            })?
            .with_paging(query.paging);

        let response: ObjectEnvelope<Note> = self.client.send(&envelope).await?;

        Ok(response
            .into_vec()
            .into_iter()
            .map(|mut note| {
                note.image_url = self.client.image_url(&note.image_url);
                note
            })
            .collect())
    }

    /// Find notes by text and tags with default paging.
    pub async fn search<I, S>(&self, text: impl Into<String>, tags: I) -> Result<Vec<Note>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.find(FindNotesQuery::new(text).with_tags(tags)).await
    }

    /// Get a note by ID.
    ///
    /// Returns the first object of the read result; an empty result is
    /// [`Error::NotFound`].
    pub async fn get(&self, id: &str) -> Result<Note> {
        let envelope = self
            .client
            .envelope(Action::Read)
            .with_object_id(vec![id.to_string()]);

        let response: ObjectEnvelope<Note> = self.client.send(&envelope).await?;
        response
            .into_vec()
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("note {}", id)))
    }

    /// Create a new note under the configured notes root.
    pub async fn create(&self, note: NewNote) -> Result<WriteResult> {
        let mut envelope = self.client.envelope(Action::Create).with_object(&NotePayload {
            kind: NOTE_TYPE,
            title: &note.title,
            text: &note.text,
            tags: &note.tags,
            files: None,
        })?;
        if let Some(root) = &self.client.inner().notes_root {
            envelope = envelope.with_object_id(root.as_str());
        }

        self.client.send(&envelope).await
    }

    /// Replace a note's title, text, tags and files.
    pub async fn update(&self, id: &str, update: NoteUpdate) -> Result<WriteResult> {
        let envelope = self
            .client
            .envelope(Action::Update)
            .with_object_id(id)
            .with_object(&NotePayload {
                kind: NOTE_TYPE,
                title: &update.title,
                text: &update.text,
                tags: &update.tags,
                files: Some(&update.files),
            })?;

        self.client.send(&envelope).await
    }

    /// Delete a note.
    pub async fn delete(&self, id: &str) -> Result<WriteResult> {
        let envelope = self.client.envelope(Action::Delete).with_object_id(id);
        self.client.send(&envelope).await
    }
}
