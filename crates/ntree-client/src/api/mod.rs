//! API endpoint implementations.

mod files;
mod notes;
mod tags;

pub use files::{FilesApi, UPLOAD_FIELD};
pub use notes::NotesApi;
pub use tags::TagsApi;
