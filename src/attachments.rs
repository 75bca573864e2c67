use crate::backend::{BlobStore, ImageFile, UploadError};
use crate::reconciler::{RequestId, RequestStatus};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Image URLs of the entry being edited, plus the uploads still running for it.
///
/// URLs are appended in the order uploads *finish*. Detaching only edits the
/// list; the remote object is left alone.
#[derive(Debug, Default, Clone)]
pub struct ImageAttachments {
    images: Vec<String>,
    pending: BTreeMap<RequestId, String>,
    next_id: RequestId,
    last_status: Option<RequestStatus>,
}

impl ImageAttachments {
    pub fn new(images: Vec<String>) -> Self {
        ImageAttachments {
            images,
            ..Default::default()
        }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.pending.values().map(String::as_str)
    }

    pub fn is_pending(&self, id: RequestId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn last_status(&self) -> Option<&RequestStatus> {
        self.last_status.as_ref()
    }

    /// Registers an upload about to start; `label` is what the UI shows for it.
    pub fn begin(&mut self, label: impl Into<String>) -> RequestId {
        self.next_id += 1;
        self.pending.insert(self.next_id, label.into());
        self.last_status = Some(RequestStatus::Pending);
        self.next_id
    }

    /// Records a finished upload. Unknown ids (from a previous editor session)
    /// are ignored.
    pub fn complete(&mut self, id: RequestId, result: Result<String, UploadError>) -> RequestStatus {
        let Some(label) = self.pending.remove(&id) else {
            warn!(request_id = id, "completion for an upload that is not pending, ignored");
            return RequestStatus::Failed(format!("upload {id} is not pending"));
        };
        let status = match result {
            Ok(url) => {
                info!(file = %label, %url, "image attached");
                self.images.push(url);
                RequestStatus::Succeeded
            }
            Err(e) => {
                error!(file = %label, error = %e, "image upload failed");
                RequestStatus::Failed(format!("{label}: {e}"))
            }
        };
        self.last_status = Some(status.clone());
        status
    }

    /// Uploads `file` and appends its URL on success.
    pub async fn attach<S: BlobStore>(&mut self, store: &S, file: &ImageFile) -> RequestStatus {
        let id = self.begin(file.name.clone());
        let result = store.upload_blob(file).await;
        self.complete(id, result)
    }

    /// Swaps in another entry's images. Ids keep counting so a late
    /// completion from before the swap can never match a new upload.
    pub fn reset(&mut self, images: Vec<String>) {
        self.images = images;
        self.pending.clear();
        self.last_status = None;
    }

    /// Replaces the image list only; uploads in flight stay pending.
    pub fn replace_images(&mut self, images: Vec<String>) {
        self.images = images;
    }

    pub fn detach(&mut self, index: usize) -> Option<String> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }
}

/// An upload the event loop still has to run: read the file, then push it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub id: RequestId,
    pub day: NaiveDate,
    pub path: PathBuf,
    pub max_bytes: u64,
}

#[derive(Debug)]
pub struct UploadOutcome {
    pub request: UploadRequest,
    pub result: Result<String, UploadError>,
}

impl UploadRequest {
    pub async fn execute<S: BlobStore>(self, store: &S) -> UploadOutcome {
        let result = match ImageFile::load(&self.path, self.max_bytes).await {
            Ok(file) => store.upload_blob(&file).await,
            Err(e) => Err(e),
        };
        UploadOutcome {
            request: self,
            result,
        }
    }
}
