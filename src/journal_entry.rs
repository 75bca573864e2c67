use crate::date_key::DateKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned row identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One journal row as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    #[serde(rename = "user_id", default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl JournalEntry {
    pub fn day(&self) -> DateKey {
        DateKey::of(&self.created_at)
    }

    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.title.to_lowercase().contains(needle_lowercase)
            || self.content.to_lowercase().contains(needle_lowercase)
    }
}

/// What the editor hands over on save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
}

impl EntryDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, images: Vec<String>) -> Self {
        EntryDraft {
            title: title.into(),
            content: content.into(),
            images,
        }
    }
}

impl From<&JournalEntry> for EntryDraft {
    fn from(entry: &JournalEntry) -> Self {
        EntryDraft {
            title: entry.title.clone(),
            content: entry.content.clone(),
            images: entry.images.clone(),
        }
    }
}

/// Insert payload. The backend assigns `id` and `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Update payload. `created_at` is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryUpdate {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: EntryId,
    #[serde(rename = "user_id", default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
