use crate::backend::{BackendError, BlobStore, ImageFile, JournalBackend, UploadError};
use crate::journal_entry::{EntryId, EntryUpdate, JournalEntry, NewEntry, NewNote, Note};
use crate::settings::SupabaseSettings;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// PostgREST + Storage client for one project. Built once in `main` and
/// passed by reference to everything that talks to the backend.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    bearer: String,
    entries_table: String,
    notes_table: String,
    bucket: String,
}

impl SupabaseClient {
    pub fn new(settings: &SupabaseSettings) -> Self {
        SupabaseClient {
            http: reqwest::Client::new(),
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
            bearer: settings
                .access_token
                .clone()
                .unwrap_or_else(|| settings.anon_key.clone()),
            entries_table: settings.entries_table.clone(),
            notes_table: settings.notes_table.clone(),
            bucket: settings.bucket.clone(),
        }
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.bearer)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        owner: Option<&str>,
    ) -> Result<Vec<T>, BackendError> {
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", "created_at.asc".to_string()),
        ];
        if let Some(owner) = owner {
            params.push(("user_id", format!("eq.{owner}")));
        }
        let response = self
            .request(reqwest::Method::GET, self.rest_url(table))
            .query(&params)
            .send()
            .await?;
        read_json(response).await
    }

    async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .request(reqwest::Method::POST, self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(&[body])
            .send()
            .await?;
        first_row(read_json(response).await?)
    }
}

/// Object key for a fresh upload: a random name keeping the extension.
pub fn object_path(extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("journal-images/{}.{}", Uuid::new_v4(), ext),
        None => format!("journal-images/{}", Uuid::new_v4()),
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await?;
    decode_body(status, &body)
}

fn decode_body<T: DeserializeOwned>(status: reqwest::StatusCode, body: &str) -> Result<T, BackendError> {
    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }
    serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// `return=representation` answers with the inserted rows; one is expected.
fn first_row<T>(rows: Vec<T>) -> Result<T, BackendError> {
    rows.into_iter().next().ok_or(BackendError::EmptyInsert)
}

impl JournalBackend for SupabaseClient {
    async fn query_entries(&self, owner: Option<&str>) -> Result<Vec<JournalEntry>, BackendError> {
        self.select(&self.entries_table, owner).await
    }

    async fn insert_entry(&self, fields: &NewEntry) -> Result<JournalEntry, BackendError> {
        self.insert(&self.entries_table, fields).await
    }

    async fn update_entry(&self, id: &EntryId, fields: &EntryUpdate) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::PATCH, self.rest_url(&self.entries_table))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(fields)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        debug!(entry_id = %id, "update accepted");
        Ok(())
    }

    async fn query_notes(&self, owner: Option<&str>) -> Result<Vec<Note>, BackendError> {
        self.select(&self.notes_table, owner).await
    }

    async fn insert_note(&self, fields: &NewNote) -> Result<Note, BackendError> {
        self.insert(&self.notes_table, fields).await
    }
}

impl BlobStore for SupabaseClient {
    async fn upload_blob(&self, file: &ImageFile) -> Result<String, UploadError> {
        let path = object_path(file.extension().as_deref());
        let response = self
            .request(reqwest::Method::POST, self.object_url(&path))
            .header(reqwest::header::CONTENT_TYPE, file.content_type)
            .header("x-upsert", "false")
            .body(file.bytes.clone())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        debug!(%path, size = file.bytes.len(), "blob stored");
        Ok(self.public_url(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    const ROW: &str = r#"[{"id":"r1","user_id":"u","title":"Beach","content":"Sun","images":null,
        "created_at":"2024-05-01T10:00:00Z","updated_at":"2024-05-01T10:00:00Z"}]"#;

    fn settings() -> SupabaseSettings {
        SupabaseSettings {
            url: "https://abc.supabase.co/".into(),
            anon_key: "anon".into(),
            access_token: None,
            entries_table: "journal_entries".into(),
            notes_table: "notes".into(),
            bucket: "journal-images".into(),
            owner_id: None,
        }
    }

    #[test]
    fn urls_are_built_without_double_slashes() {
        let client = SupabaseClient::new(&settings());
        assert_eq!(
            client.rest_url("journal_entries"),
            "https://abc.supabase.co/rest/v1/journal_entries"
        );
        assert_eq!(
            client.public_url("journal-images/x.png"),
            "https://abc.supabase.co/storage/v1/object/public/journal-images/journal-images/x.png"
        );
        assert_eq!(
            client.object_url("journal-images/x.png"),
            "https://abc.supabase.co/storage/v1/object/journal-images/journal-images/x.png"
        );
    }

    #[test]
    fn bearer_falls_back_to_anon_key() {
        let client = SupabaseClient::new(&settings());
        assert_eq!(client.bearer, "anon");

        let mut signed_in = settings();
        signed_in.access_token = Some("jwt".into());
        assert_eq!(SupabaseClient::new(&signed_in).bearer, "jwt");
    }

    #[test]
    fn object_paths_are_random_and_keep_extension() {
        let a = object_path(Some("png"));
        let b = object_path(Some("png"));
        assert!(a.starts_with("journal-images/"));
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
        assert!(!object_path(None).contains('.'));
    }

    #[test]
    fn rows_decode_from_a_successful_response() {
        let rows: Vec<JournalEntry> = decode_body(StatusCode::CREATED, ROW).unwrap();
        let row = first_row(rows).unwrap();
        assert_eq!(row.id, EntryId("r1".into()));
        assert_eq!(row.title, "Beach");
        assert!(row.images.is_empty());
    }

    #[test]
    fn error_status_keeps_code_and_body() {
        let body = r#"{"message":"JWT expired"}"#;
        let err = decode_body::<Vec<JournalEntry>>(StatusCode::UNAUTHORIZED, body).unwrap_err();
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("JWT expired"));
            }
            other => panic!("expected a status error, got: {other:?}"),
        }
    }

    #[test]
    fn empty_insert_answer_is_an_error() {
        let rows: Vec<JournalEntry> = decode_body(StatusCode::CREATED, "[]").unwrap();
        assert!(matches!(first_row(rows), Err(BackendError::EmptyInsert)));
    }

    #[test]
    fn malformed_row_is_a_decode_error() {
        let body = r#"[{"id":"r1","title":"no timestamps"}]"#;
        let err = decode_body::<Vec<JournalEntry>>(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }
}
