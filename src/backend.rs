use crate::journal_entry::{EntryId, EntryUpdate, JournalEntry, NewEntry, NewNote, Note};
use std::future::Future;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to backend failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("insert returned no row")]
    EmptyInsert,
    #[error("unexpected backend payload: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not an image file")]
    UnsupportedType(String),
    #[error("{name} is {size} bytes, the limit is {limit}")]
    TooLarge { name: String, size: u64, limit: u64 },
    #[error("upload failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("storage answered {status}: {body}")]
    Status { status: u16, body: String },
}

/// Row storage for entries and quick notes.
pub trait JournalBackend {
    fn query_entries(
        &self,
        owner: Option<&str>,
    ) -> impl Future<Output = Result<Vec<JournalEntry>, BackendError>>;

    fn insert_entry(
        &self,
        fields: &NewEntry,
    ) -> impl Future<Output = Result<JournalEntry, BackendError>>;

    fn update_entry(
        &self,
        id: &EntryId,
        fields: &EntryUpdate,
    ) -> impl Future<Output = Result<(), BackendError>>;

    fn query_notes(&self, owner: Option<&str>)
        -> impl Future<Output = Result<Vec<Note>, BackendError>>;

    fn insert_note(&self, fields: &NewNote) -> impl Future<Output = Result<Note, BackendError>>;
}

/// Object storage that hands back a public URL for each uploaded blob.
pub trait BlobStore {
    fn upload_blob(&self, file: &ImageFile) -> impl Future<Output = Result<String, UploadError>>;
}

/// An image picked by the user, read fully into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub async fn load(path: &Path, max_bytes: u64) -> Result<Self, UploadError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        // Reject by name before touching the disk.
        content_type_for(&name).ok_or_else(|| UploadError::UnsupportedType(name.clone()))?;
        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(name, bytes, max_bytes)
    }

    pub fn from_bytes(
        name: impl Into<String>,
        bytes: Vec<u8>,
        max_bytes: u64,
    ) -> Result<Self, UploadError> {
        let name = name.into();
        let content_type =
            content_type_for(&name).ok_or_else(|| UploadError::UnsupportedType(name.clone()))?;
        let size = bytes.len() as u64;
        if size > max_bytes {
            return Err(UploadError::TooLarge {
                name,
                size,
                limit: max_bytes,
            });
        }
        Ok(ImageFile {
            name,
            content_type,
            bytes,
        })
    }

    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

fn content_type_for(name: &str) -> Option<&'static str> {
    match extension_of(name)?.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
