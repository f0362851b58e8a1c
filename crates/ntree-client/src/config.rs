//! Client configuration.
//!
//! All settings have production defaults, so an empty file is a valid
//! config. Keys are kebab-case:
//!
//! ```toml
//! api-url = "https://ntree.online/proxy/NTreeNotesServer/api"
//! upload-url = "https://ntree.online/upload"
//! image-host = "http://ntree.online"
//! namespace = "NTreeNotes"
//! notes-root = "fc3_20200326_XdBAcER1CHo8Y498"
//! timeout-secs = 30
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://ntree.online/proxy/NTreeNotesServer/api";

/// Default upload endpoint.
pub const DEFAULT_UPLOAD_URL: &str = "https://ntree.online/upload";

/// Host that relative note image paths are resolved against.
pub const DEFAULT_IMAGE_HOST: &str = "http://ntree.online";

/// Application namespace sent in every envelope.
pub const DEFAULT_NAMESPACE: &str = "NTreeNotes";

/// Parent object new notes are created under.
pub const DEFAULT_NOTES_ROOT: &str = "fc3_20200326_XdBAcER1CHo8Y498";

/// Settings for an [`NTreeClient`](crate::NTreeClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientConfig {
    /// Endpoint receiving all envelope requests.
    pub api_url: String,
    /// Endpoint receiving multipart uploads.
    pub upload_url: String,
    /// Prefix for relative image URLs.
    pub image_host: String,
    /// Namespace sent in every envelope.
    pub namespace: String,
    /// Parent object for new notes. Unset or empty omits `objectId` from
    /// note creation envelopes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_root: Option<String>,
    /// Per-request timeout. Unset leaves timeouts to the transport.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Custom user agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            image_host: DEFAULT_IMAGE_HOST.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            notes_root: Some(DEFAULT_NOTES_ROOT.to_string()),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        tracing::debug!(path = %path.display(), "Loaded client config");
        Self::from_toml(&content)
    }

    /// Request timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
