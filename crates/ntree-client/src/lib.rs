//! HTTP client SDK for the NTree notes service.
//!
//! This crate provides a typed client for the NTree notes API: notes, tags
//! and file attachments stored on the server.
//!
//! # Example
//!
//! ```no_run
//! use ntree_client::{NTreeClient, NewNote, Result, SharedTicket};
//!
//! # async fn example() -> Result<()> {
//! // The authorization layer fills this slot as upload tickets are issued
//! let tickets = SharedTicket::new();
//!
//! let client = NTreeClient::builder()
//!     .credentials(tickets.clone())
//!     .build()?;
//!
//! // Search notes tagged "work"
//! for note in client.notes().search("meeting", ["work"]).await? {
//!     println!("{}: {}", note.id, note.title);
//! }
//!
//! // Create a note
//! let created = client
//!     .notes()
//!     .create(NewNote::new("Groceries", "milk, eggs").with_tags(["home"]))
//!     .await?;
//!
//! // Upload a file and attach it to the note
//! tickets.set("ticket-from-auth");
//! let upload = client.files().upload_bytes("list.txt", b"milk".to_vec()).await?;
//! if let (Some(file_id), Some(note_id)) = (upload.assigned_id(), created.object_id) {
//!     client.files().save(file_id).await?;
//!     let ack = client.files().attach_to_note(file_id, &note_id).await?;
//!     println!("attached: {}", ack.ok);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Protocol
//!
//! Every call except uploads is one POST of an [`Envelope`] to the API
//! endpoint; uploads are a multipart POST to a separate endpoint carrying the
//! upload ticket in `X-SourceId`. Session cookies are kept by the client and
//! sent with every request. Failed requests are not retried.
//!
//! # API Coverage
//!
//! - **Notes**: find, get, create, update, delete
//! - **Tags**: list, create, delete
//! - **Files**: upload, save, attach to note, delete

pub mod api;
pub mod client;
pub mod config;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, NTreeClient};
pub use config::ClientConfig;
pub use credentials::{SharedTicket, StaticTicket, UploadCredentials};
pub use envelope::{Acknowledgement, Action, Envelope, ObjectId, Paging};
pub use error::{Error, Result};
pub use types::*;

// Re-export the multipart form type accepted by `FilesApi::upload`
pub use reqwest::multipart;
