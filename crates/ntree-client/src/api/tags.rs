//! Tags API.

use serde::Serialize;

use crate::client::NTreeClient;
use crate::envelope::{Action, ObjectEnvelope};
use crate::error::Result;
use crate::types::{Tag, WriteResult};

const TAG_TYPE: &str = "tag";

#[derive(Serialize)]
struct TagPayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

/// Tags API client.
pub struct TagsApi {
    client: NTreeClient,
}

impl TagsApi {
    pub(crate) fn new(client: NTreeClient) -> Self {
        Self { client }
    }

    /// List all tags. A null body or one without objects yields an empty
    /// list.
    pub async fn list(&self) -> Result<Vec<Tag>> {
        let envelope = self.client.envelope(Action::Find).with_object(&TagPayload {
            kind: TAG_TYPE,
            title: None,
        })?;

        let response: Option<ObjectEnvelope<Tag>> = self.client.send(&envelope).await?;
        Ok(response.map(ObjectEnvelope::into_vec).unwrap_or_default())
    }

    /// Create a tag with the given label.
    pub async fn create(&self, text: &str) -> Result<WriteResult> {
        let envelope = self.client.envelope(Action::Create).with_object(&TagPayload {
            kind: TAG_TYPE,
            title: Some(text),
        })?;

        self.client.send(&envelope).await
    }

    /// Delete a tag.
    pub async fn delete(&self, id: &str) -> Result<WriteResult> {
        let envelope = self.client.envelope(Action::Delete).with_object_id(id);
        self.client.send(&envelope).await
    }
}
