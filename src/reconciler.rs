use crate::backend::{BackendError, JournalBackend};
use crate::date_key::DateKey;
use crate::entry_store::EntryStore;
use crate::journal_entry::{EntryDraft, EntryId, EntryUpdate, JournalEntry, NewEntry};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use std::collections::HashMap;
use tracing::{debug, error, info};

pub type RequestId = u64;

/// Lifecycle of a save or upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveAction {
    Create(NewEntry),
    Update { id: EntryId, fields: EntryUpdate },
}

/// A save that has been decided (create or update) and is ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub id: RequestId,
    pub day: NaiveDate,
    pub action: SaveAction,
}

impl SaveAction {
    /// The editor fields this write carries.
    pub fn draft(&self) -> EntryDraft {
        match self {
            SaveAction::Create(fields) => {
                EntryDraft::new(&fields.title, &fields.content, fields.images.clone())
            }
            SaveAction::Update { fields, .. } => {
                EntryDraft::new(&fields.title, &fields.content, fields.images.clone())
            }
        }
    }
}

#[derive(Debug)]
pub enum Saved {
    Created(JournalEntry),
    Updated,
}

#[derive(Debug)]
pub struct SaveOutcome {
    pub request: SaveRequest,
    pub result: Result<Saved, BackendError>,
}

impl SaveRequest {
    pub async fn execute<B: JournalBackend>(self, backend: &B) -> SaveOutcome {
        let result = match &self.action {
            SaveAction::Create(fields) => backend.insert_entry(fields).await.map(Saved::Created),
            SaveAction::Update { id, fields } => {
                backend.update_entry(id, fields).await.map(|()| Saved::Updated)
            }
        };
        SaveOutcome {
            request: self,
            result,
        }
    }
}

/// Decides create-vs-update for the selected day and applies the result of
/// each write to the store.
///
/// Only one save per day is in flight at a time. A save issued while another
/// one for the same day is running is parked (latest draft wins) and planned
/// once the running one completes, so it sees the row the first one created.
/// The draft of the last failed save for a day is kept until the next save
/// for that day, so navigating away does not lose it.
#[derive(Debug, Default)]
pub struct SaveReconciler {
    next_id: RequestId,
    in_flight: HashMap<DateKey, RequestId>,
    queued: HashMap<DateKey, (NaiveDate, EntryDraft)>,
    status: HashMap<DateKey, RequestStatus>,
    failed: HashMap<DateKey, EntryDraft>,
}

impl SaveReconciler {
    pub fn new() -> Self {
        SaveReconciler::default()
    }

    pub fn status(&self, day: NaiveDate) -> Option<&RequestStatus> {
        self.status.get(&DateKey::from_day(day))
    }

    /// The unsaved draft of a day whose last save failed.
    pub fn failed_draft(&self, day: NaiveDate) -> Option<&EntryDraft> {
        self.failed.get(&DateKey::from_day(day))
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Returns the request to send, or `None` when the draft was queued behind
    /// a running save for the same day.
    ///
    /// A create is stamped with `day` at the current time of day, which is
    /// plain "now" whenever `day` is today.
    pub fn begin(&mut self, store: &EntryStore, day: NaiveDate, draft: EntryDraft) -> Option<SaveRequest> {
        let key = DateKey::from_day(day);
        self.failed.remove(&key);
        self.status.insert(key.clone(), RequestStatus::Pending);
        if self.in_flight.contains_key(&key) {
            debug!(date = %key, "save already running for this day, queueing");
            self.queued.insert(key, (day, draft));
            return None;
        }

        self.next_id += 1;
        let action = match store.find_for_date(day) {
            Some(existing) => SaveAction::Update {
                id: existing.id.clone(),
                fields: EntryUpdate {
                    title: draft.title,
                    content: draft.content,
                    images: draft.images,
                    updated_at: fresh_timestamp(existing.updated_at),
                },
            },
            None => {
                let now = Local::now();
                SaveAction::Create(NewEntry {
                    title: draft.title,
                    content: draft.content,
                    images: draft.images,
                    created_at: stamp_on(day, now),
                    updated_at: now.with_timezone(&Utc),
                })
            }
        };
        self.in_flight.insert(key, self.next_id);
        Some(SaveRequest {
            id: self.next_id,
            day,
            action,
        })
    }

    /// Applies a finished request. The store only changes on success. Returns
    /// the queued follow-up for the same day, if there is one.
    pub fn complete(&mut self, store: &mut EntryStore, outcome: SaveOutcome) -> Option<SaveRequest> {
        let SaveOutcome { request, result } = outcome;
        let key = DateKey::from_day(request.day);
        if self.in_flight.get(&key) == Some(&request.id) {
            self.in_flight.remove(&key);
        }

        let status = match (result, request.action) {
            (Ok(Saved::Created(row)), _) => {
                self.failed.remove(&key);
                info!(date = %key, entry_id = %row.id, request_id = request.id, "entry created");
                store.append(row);
                RequestStatus::Succeeded
            }
            (Ok(Saved::Updated), SaveAction::Update { id, fields }) => {
                self.failed.remove(&key);
                if !store.apply_update(&id, &fields) {
                    debug!(entry_id = %id, "updated entry is no longer in the store");
                }
                info!(date = %key, entry_id = %id, request_id = request.id, "entry updated");
                RequestStatus::Succeeded
            }
            (Ok(Saved::Updated), action @ SaveAction::Create(_)) => {
                self.failed.insert(key.clone(), action.draft());
                RequestStatus::Failed("backend reported an update for a create".to_string())
            }
            (Err(e), action) => {
                error!(date = %key, request_id = request.id, error = %e, "save failed");
                self.failed.insert(key.clone(), action.draft());
                RequestStatus::Failed(e.to_string())
            }
        };
        self.status.insert(key.clone(), status);

        let (day, draft) = self.queued.remove(&key)?;
        self.begin(store, day, draft)
    }

    /// Runs a save to completion, including any save queued behind it.
    pub async fn save<B: JournalBackend>(
        &mut self,
        store: &mut EntryStore,
        backend: &B,
        day: NaiveDate,
        draft: EntryDraft,
    ) -> RequestStatus {
        let mut next = self.begin(store, day, draft);
        while let Some(request) = next {
            let outcome = request.execute(backend).await;
            next = self.complete(store, outcome);
        }
        self.status(day).cloned().unwrap_or(RequestStatus::Pending)
    }
}

/// A timestamp strictly later than `previous`.
fn fresh_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// `day` at the current local time of day, so that a new entry lands on the
/// selected calendar day.
fn stamp_on(day: NaiveDate, now: DateTime<Local>) -> DateTime<Utc> {
    day.and_time(now.time())
        .and_local_timezone(Local)
        .earliest()
        .or_else(|| day.and_hms_opt(12, 0, 0)?.and_local_timezone(Local).earliest())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}
