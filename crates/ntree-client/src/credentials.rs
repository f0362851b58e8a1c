//! Upload credentials.
//!
//! The upload endpoint authenticates with an opaque ticket sent in the
//! `X-SourceId` header. Acquiring and refreshing that ticket belongs to the
//! authorization layer; the client only asks it for the current value.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Error, Result};

/// Header carrying the upload ticket.
pub const SOURCE_ID_HEADER: &str = "X-SourceId";

/// Source of the current upload ticket.
#[async_trait]
pub trait UploadCredentials: Send + Sync + std::fmt::Debug {
    /// Get the ticket to send with the next upload.
    async fn upload_ticket(&self) -> Result<String>;
}

/// A fixed ticket.
#[derive(Debug, Clone)]
pub struct StaticTicket(String);

impl StaticTicket {
    pub fn new(ticket: impl Into<String>) -> Self {
        Self(ticket.into())
    }
}

#[async_trait]
impl UploadCredentials for StaticTicket {
    async fn upload_ticket(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// A ticket slot the authorization layer updates as tickets are issued.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct SharedTicket {
    ticket: Arc<RwLock<Option<String>>>,
}

impl SharedTicket {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly issued ticket.
    pub fn set(&self, ticket: impl Into<String>) {
        *self.ticket.write() = Some(ticket.into());
    }

    /// Drop the current ticket.
    pub fn clear(&self) {
        *self.ticket.write() = None;
    }

    /// The current ticket, if any.
    pub fn current(&self) -> Option<String> {
        self.ticket.read().clone()
    }
}

#[async_trait]
impl UploadCredentials for SharedTicket {
    async fn upload_ticket(&self) -> Result<String> {
        self.current()
            .ok_or_else(|| Error::Credential("no upload ticket has been issued".to_string()))
    }
}
