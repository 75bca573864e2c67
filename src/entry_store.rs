use crate::date_key::DateKey;
use crate::journal_entry::{EntryId, EntryUpdate, JournalEntry};
use crate::resolver;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::warn;

/// The session's entries, in the order the backend returned them followed by
/// anything created locally since.
///
/// Entries are addressed by id; `by_day` caches which ids fall on each local
/// calendar day so date lookups stay unambiguous even when the one-entry-per-day
/// rule has been broken upstream.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<JournalEntry>,
    by_day: HashMap<DateKey, Vec<EntryId>>,
}

impl EntryStore {
    pub fn new() -> Self {
        EntryStore::default()
    }

    pub fn from_entries(entries: Vec<JournalEntry>) -> Self {
        let mut store = EntryStore::new();
        for entry in entries {
            store.append(entry);
        }
        for (day, ids) in store.by_day.iter().filter(|(_, ids)| ids.len() > 1) {
            warn!(date = %day, count = ids.len(), "multiple entries share one day, first one wins");
        }
        store
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn find_for_date(&self, day: NaiveDate) -> Option<&JournalEntry> {
        self.by_day
            .get(&DateKey::from_day(day))
            .and_then(|ids| ids.first())
            .and_then(|id| self.get(id))
    }

    pub fn days_with_entries(&self) -> HashMap<DateKey, bool> {
        resolver::entries_by_day(&self.entries)
    }

    pub fn search(&self, query: &str) -> Vec<&JournalEntry> {
        resolver::filter_by_search(&self.entries, query)
    }

    pub fn append(&mut self, entry: JournalEntry) {
        self.by_day.entry(entry.day()).or_default().push(entry.id.clone());
        self.entries.push(entry);
    }

    /// Applies a successful update in place. `created_at`, and therefore the
    /// day index, is untouched. Returns false when the id is unknown.
    pub fn apply_update(&mut self, id: &EntryId, update: &EntryUpdate) -> bool {
        match self.entries.iter_mut().find(|e| &e.id == id) {
            Some(entry) => {
                entry.title = update.title.clone();
                entry.content = update.content.clone();
                entry.images = update.images.clone();
                entry.updated_at = update.updated_at;
                true
            }
            None => false,
        }
    }
}
