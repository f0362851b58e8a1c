//! Files API.
//!
//! Attaching a file is three calls: [`FilesApi::upload`] sends the bytes and
//! yields a file ID, [`FilesApi::save`] registers the file record, and
//! [`FilesApi::attach_to_note`] links it to a note. Each call is independent;
//! the caller sequences them.
//!
//! `save`, `attach_to_note` and `delete` return an [`Acknowledgement`] whose
//! `ok` flag is always present: a missing or falsy flag becomes `false`.

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;

use crate::client::NTreeClient;
use crate::envelope::{Acknowledgement, Action, SuccessCheck};
use crate::error::Result;
use crate::types::UploadResult;

/// Form field used by [`FilesApi::upload_bytes`].
pub const UPLOAD_FIELD: &str = "file";

const FILE_TYPE: &str = "file";

#[derive(Serialize)]
struct FileRecord<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
}

#[derive(Serialize)]
struct FileLink<'a> {
    files: [&'a str; 1],
}

/// Files API client.
pub struct FilesApi {
    client: NTreeClient,
}

impl FilesApi {
    pub(crate) fn new(client: NTreeClient) -> Self {
        Self { client }
    }

    /// Upload a multipart form to the upload endpoint.
    ///
    /// Sends the current upload ticket in the `X-SourceId` header.
    pub async fn upload(&self, form: Form) -> Result<UploadResult> {
        self.client.upload(form).await
    }

    /// Upload raw bytes as a single file part.
    pub async fn upload_bytes(
        &self,
        file_name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Result<UploadResult> {
        let part = Part::bytes(bytes.into()).file_name(file_name.into());
        self.upload(Form::new().part(UPLOAD_FIELD, part)).await
    }

    /// Register an uploaded file. Success requires a truthy `ok`.
    pub async fn save(&self, file_id: &str) -> Result<Acknowledgement> {
        let envelope = self.client.envelope(Action::Create).with_object(&FileRecord {
            id: file_id,
            kind: FILE_TYPE,
            title: file_id,
        })?;

        let body: Value = self.client.send(&envelope).await?;
        Ok(Acknowledgement::from_body(body, SuccessCheck::Truthy))
    }

    /// Attach a file to a note. Success requires a truthy `ok`.
    pub async fn attach_to_note(&self, file_id: &str, note_id: &str) -> Result<Acknowledgement> {
        let envelope = self
            .client
            .envelope(Action::Update)
            .with_object_id(note_id)
            .with_object(&FileLink { files: [file_id] })?;

        let body: Value = self.client.send(&envelope).await?;
        Ok(Acknowledgement::from_body(body, SuccessCheck::Truthy))
    }

    /// Delete a file. Success requires `ok` to be exactly `true`.
    pub async fn delete(&self, file_id: &str) -> Result<Acknowledgement> {
        let envelope = self.client.envelope(Action::Delete).with_object_id(file_id);

        let body: Value = self.client.send(&envelope).await?;
        Ok(Acknowledgement::from_body(body, SuccessCheck::Strict))
    }
}
