use crate::attachments::{ImageAttachments, UploadOutcome, UploadRequest};
use crate::backend::{BackendError, BlobStore, JournalBackend};
use crate::calendar::{self, MonthView};
use crate::entry_store::EntryStore;
use crate::journal_entry::{EntryDraft, JournalEntry, NewNote, Note};
use crate::reconciler::{RequestStatus, SaveOutcome, SaveReconciler, SaveRequest};
use crate::text_input::TextInput;
use chrono::{NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::future::{FutureExt, LocalBoxFuture};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Journal,
    Notes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Calendar,
    Search,
    Title,
    Content,
    Images,
    ImagePath,
}

/// Backend work requested by a key press.
#[derive(Debug)]
pub enum Command {
    Save(SaveRequest),
    Upload(UploadRequest),
    SaveNote(NewNote),
}

#[derive(Debug)]
pub enum Completion {
    Save(SaveOutcome),
    Upload(UploadOutcome),
    Note(Result<Note, BackendError>),
}

impl Command {
    pub fn run<'a, C>(self, client: &'a C) -> LocalBoxFuture<'a, Completion>
    where
        C: JournalBackend + BlobStore,
    {
        match self {
            Command::Save(request) => {
                async move { Completion::Save(request.execute(client).await) }.boxed_local()
            }
            Command::Upload(request) => {
                async move { Completion::Upload(request.execute(client).await) }.boxed_local()
            }
            Command::SaveNote(note) => {
                async move { Completion::Note(client.insert_note(&note).await) }.boxed_local()
            }
        }
    }
}

/// Editor form for the selected day.
#[derive(Debug, Clone)]
pub struct Editor {
    pub day: NaiveDate,
    pub title: TextInput,
    pub content: TextInput,
    pub attachments: ImageAttachments,
    pub image_cursor: usize,
    pub path: TextInput,
}

impl Editor {
    pub fn new(day: NaiveDate, entry: Option<&JournalEntry>) -> Self {
        let mut editor = Editor {
            day,
            title: TextInput::single_line(""),
            content: TextInput::multi_line(""),
            attachments: ImageAttachments::default(),
            image_cursor: 0,
            path: TextInput::single_line(""),
        };
        editor.load(day, entry);
        editor
    }

    /// Refills the form from `entry`, or empties it when the day has none.
    pub fn load(&mut self, day: NaiveDate, entry: Option<&JournalEntry>) {
        let draft = entry.map(EntryDraft::from).unwrap_or_default();
        self.day = day;
        self.title.set(draft.title);
        self.content.set(draft.content);
        self.attachments.reset(draft.images);
        self.image_cursor = 0;
        self.path.clear();
    }

    /// Puts an unsaved draft back into the form, keeping running uploads.
    pub fn restore(&mut self, draft: EntryDraft) {
        self.title.set(draft.title);
        self.content.set(draft.content);
        self.attachments.replace_images(draft.images);
    }

    pub fn draft(&self) -> EntryDraft {
        EntryDraft::new(
            self.title.value(),
            self.content.value(),
            self.attachments.images().to_vec(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct NoteEditor {
    pub title: TextInput,
    pub content: TextInput,
    pub status: Option<RequestStatus>,
}

impl Default for NoteEditor {
    fn default() -> Self {
        NoteEditor {
            title: TextInput::single_line(""),
            content: TextInput::multi_line(""),
            status: None,
        }
    }
}

pub struct App {
    pub today: NaiveDate,
    pub selected: NaiveDate,
    pub tab: Tab,
    pub focus: Focus,
    pub store: EntryStore,
    pub notes: Vec<Note>,
    pub reconciler: SaveReconciler,
    pub editor: Editor,
    pub note_editor: NoteEditor,
    pub search: TextInput,
    pub result_index: usize,
    pub max_upload_bytes: u64,
    pub message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: EntryStore, notes: Vec<Note>, today: NaiveDate, max_upload_bytes: u64) -> Self {
        let editor = Editor::new(today, store.find_for_date(today));
        App {
            today,
            selected: today,
            tab: Tab::Journal,
            focus: Focus::Calendar,
            store,
            notes,
            reconciler: SaveReconciler::new(),
            editor,
            note_editor: NoteEditor::default(),
            search: TextInput::single_line(""),
            result_index: 0,
            max_upload_bytes,
            message: None,
            should_quit: false,
        }
    }

    pub fn current_entry(&self) -> Option<&JournalEntry> {
        self.store.find_for_date(self.selected)
    }

    /// Search hits, empty while the search box is empty.
    pub fn search_results(&self) -> Vec<&JournalEntry> {
        if self.search.value().is_empty() {
            return Vec::new();
        }
        self.store.search(self.search.value())
    }

    pub fn month_view(&self) -> MonthView {
        MonthView::build(self.selected, self.today, &self.store.days_with_entries())
    }

    pub fn select_date(&mut self, day: NaiveDate) {
        self.selected = day;
        if self.editor.day != day {
            let entry = self.store.find_for_date(day);
            self.editor.load(day, entry);
            if let Some(draft) = self.reconciler.failed_draft(day) {
                self.editor.restore(draft.clone());
            }
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.focus = match tab {
            Tab::Journal => Focus::Calendar,
            Tab::Notes => Focus::Title,
        };
    }

    pub fn request_save(&mut self) -> Option<Command> {
        let request = self
            .reconciler
            .begin(&self.store, self.editor.day, self.editor.draft());
        self.message = None;
        request.map(Command::Save)
    }

    pub fn request_note_save(&mut self) -> Option<Command> {
        let title = self.note_editor.title.value().trim();
        let content = self.note_editor.content.value().trim();
        if title.is_empty() && content.is_empty() {
            self.message = Some("Nothing to save".to_string());
            return None;
        }
        let now = Utc::now();
        self.note_editor.status = Some(RequestStatus::Pending);
        Some(Command::SaveNote(NewNote {
            title: self.note_editor.title.value().to_string(),
            content: self.note_editor.content.value().to_string(),
            created_at: now,
            updated_at: now,
        }))
    }

    pub fn request_upload(&mut self, raw_path: &str) -> Option<Command> {
        let path = expand_home(raw_path.trim());
        if path.as_os_str().is_empty() {
            return None;
        }
        let id = self.editor.attachments.begin(upload_label(&path));
        Some(Command::Upload(UploadRequest {
            id,
            day: self.editor.day,
            path,
            max_bytes: self.max_upload_bytes,
        }))
    }

    /// Applies a finished backend call and returns any follow-up work.
    pub fn on_completion(&mut self, completion: Completion) -> Option<Command> {
        match completion {
            Completion::Save(outcome) => self
                .reconciler
                .complete(&mut self.store, outcome)
                .map(Command::Save),
            Completion::Upload(outcome) => {
                let attachments = &mut self.editor.attachments;
                if outcome.request.day == self.editor.day && attachments.is_pending(outcome.request.id) {
                    attachments.complete(outcome.request.id, outcome.result);
                } else if outcome.request.day == self.editor.day {
                    // The day was reloaded while the upload ran.
                    info!(date = %outcome.request.day, "upload finished after its day was reopened");
                    let id = attachments.begin(upload_label(&outcome.request.path));
                    attachments.complete(id, outcome.result);
                } else {
                    warn!(date = %outcome.request.day, "upload finished after leaving its day, dropped");
                    self.message = Some(format!(
                        "Upload for {} finished after you left that day and was not attached",
                        outcome.request.day
                    ));
                }
                None
            }
            Completion::Note(Ok(note)) => {
                info!(note_id = %note.id, "note saved");
                self.notes.push(note);
                self.note_editor.title.clear();
                self.note_editor.content.clear();
                self.note_editor.status = Some(RequestStatus::Succeeded);
                None
            }
            Completion::Note(Err(e)) => {
                error!(error = %e, "note save failed");
                self.note_editor.status = Some(RequestStatus::Failed(e.to_string()));
                None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => {
                    self.should_quit = true;
                    None
                }
                KeyCode::Char('s') => match self.tab {
                    Tab::Journal => self.request_save(),
                    Tab::Notes => self.request_note_save(),
                },
                _ => None,
            };
        }
        match key.code {
            KeyCode::F(1) => {
                self.switch_tab(Tab::Journal);
                return None;
            }
            KeyCode::F(2) => {
                self.switch_tab(Tab::Notes);
                return None;
            }
            KeyCode::Tab => {
                self.focus = self.next_focus();
                return None;
            }
            KeyCode::Esc => {
                self.focus = match self.focus {
                    Focus::ImagePath => Focus::Images,
                    _ => Focus::Calendar,
                };
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Calendar => self.calendar_key(key),
            Focus::Search => {
                match key.code {
                    KeyCode::Up => self.result_index = self.result_index.saturating_sub(1),
                    KeyCode::Down => {
                        if self.result_index + 1 < self.search_results().len() {
                            self.result_index += 1;
                        }
                    }
                    KeyCode::Enter => {
                        let target = self
                            .search_results()
                            .get(self.result_index)
                            .map(|e| e.created_at.with_timezone(&chrono::Local).date_naive());
                        if let Some(day) = target {
                            self.select_date(day);
                            self.focus = Focus::Title;
                        }
                    }
                    _ => {
                        if self.search.handle_key(key) {
                            self.result_index = 0;
                        }
                    }
                }
                None
            }
            Focus::Title => {
                let title = match self.tab {
                    Tab::Journal => &mut self.editor.title,
                    Tab::Notes => &mut self.note_editor.title,
                };
                if key.code == KeyCode::Enter {
                    self.focus = Focus::Content;
                } else {
                    title.handle_key(key);
                }
                None
            }
            Focus::Content => {
                match self.tab {
                    Tab::Journal => self.editor.content.handle_key(key),
                    Tab::Notes => self.note_editor.content.handle_key(key),
                };
                None
            }
            Focus::Images => {
                let count = self.editor.attachments.images().len();
                match key.code {
                    KeyCode::Up => self.editor.image_cursor = self.editor.image_cursor.saturating_sub(1),
                    KeyCode::Down => {
                        if self.editor.image_cursor + 1 < count {
                            self.editor.image_cursor += 1;
                        }
                    }
                    KeyCode::Char('a') => {
                        self.editor.path.clear();
                        self.focus = Focus::ImagePath;
                    }
                    KeyCode::Char('d') | KeyCode::Delete => {
                        if let Some(url) = self.editor.attachments.detach(self.editor.image_cursor) {
                            info!(%url, "image detached");
                        }
                        let remaining = self.editor.attachments.images().len();
                        self.editor.image_cursor = self.editor.image_cursor.min(remaining.saturating_sub(1));
                    }
                    _ => {}
                }
                None
            }
            Focus::ImagePath => {
                if key.code == KeyCode::Enter {
                    let raw = self.editor.path.value().to_string();
                    self.editor.path.clear();
                    self.focus = Focus::Images;
                    self.request_upload(&raw)
                } else {
                    self.editor.path.handle_key(key);
                    None
                }
            }
        }
    }

    fn calendar_key(&mut self, key: KeyEvent) -> Option<Command> {
        let day = self.selected;
        match key.code {
            KeyCode::Left => self.select_date(calendar::shift_days(day, -1)),
            KeyCode::Right => self.select_date(calendar::shift_days(day, 1)),
            KeyCode::Up => self.select_date(calendar::shift_days(day, -7)),
            KeyCode::Down => self.select_date(calendar::shift_days(day, 7)),
            KeyCode::PageUp => self.select_date(calendar::shift_months(day, -1)),
            KeyCode::PageDown => self.select_date(calendar::shift_months(day, 1)),
            KeyCode::Char('t') => self.select_date(self.today),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('1') => self.switch_tab(Tab::Journal),
            KeyCode::Char('2') => self.switch_tab(Tab::Notes),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter if self.tab == Tab::Journal => self.focus = Focus::Title,
            _ => {}
        }
        None
    }

    fn next_focus(&self) -> Focus {
        match (self.tab, self.focus) {
            (Tab::Journal, Focus::Calendar) => Focus::Search,
            (Tab::Journal, Focus::Search) => Focus::Title,
            (Tab::Journal, Focus::Title) => Focus::Content,
            (Tab::Journal, Focus::Content) => Focus::Images,
            (Tab::Journal, _) => Focus::Calendar,
            (Tab::Notes, Focus::Title) => Focus::Content,
            (Tab::Notes, Focus::Content) => Focus::Calendar,
            (Tab::Notes, _) => Focus::Title,
        }
    }

    /// One-line summary of the selected day's save and upload state.
    pub fn status_line(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        if self.tab == Tab::Notes {
            return match &self.note_editor.status {
                Some(RequestStatus::Pending) => "Saving note...".to_string(),
                Some(RequestStatus::Succeeded) => "Note saved".to_string(),
                Some(RequestStatus::Failed(e)) => format!("Note not saved: {e} (Ctrl-S to retry)"),
                None => String::new(),
            };
        }
        let mut parts = Vec::new();
        match self.reconciler.status(self.editor.day) {
            Some(RequestStatus::Pending) => parts.push("Saving...".to_string()),
            Some(RequestStatus::Succeeded) => parts.push("Saved".to_string()),
            Some(RequestStatus::Failed(e)) => parts.push(format!("Save failed: {e} (Ctrl-S to retry)")),
            None => {}
        }
        let uploading = self.editor.attachments.pending().count();
        if uploading > 0 {
            parts.push(format!("Uploading {uploading} image(s)"));
        } else if let Some(RequestStatus::Failed(e)) = self.editor.attachments.last_status() {
            parts.push(format!("Upload failed: {e}"));
        }
        parts.join(" | ")
    }
}

fn upload_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{entry_on, FakeBackend};
    use crate::date_key::DateKey;
    use rstest::{fixture, rstest};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            assert!(app.handle_key(press(KeyCode::Char(c))).is_none());
        }
    }

    async fn drive(app: &mut App, backend: &FakeBackend, mut command: Option<Command>) {
        while let Some(next) = command {
            let done = next.run(backend).await;
            command = app.on_completion(done);
        }
    }

    fn may(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[fixture]
    fn app() -> App {
        let store = EntryStore::from_entries(vec![
            entry_on("a", "Beach", "Sun", 2024, 5, 1),
            entry_on("b", "Work", "Meetings", 2024, 5, 2),
        ]);
        App::new(store, Vec::new(), may(2), 1024)
    }

    #[rstest]
    fn editor_starts_on_todays_entry(app: App) {
        assert_eq!(app.editor.title.value(), "Work");
        assert_eq!(app.editor.content.value(), "Meetings");
    }

    #[rstest]
    fn moving_the_calendar_reloads_the_editor(mut app: App) {
        app.handle_key(press(KeyCode::Left));
        assert_eq!(app.selected, may(1));
        assert_eq!(app.editor.title.value(), "Beach");

        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.selected, may(8));
        assert_eq!(app.editor.title.value(), "");
        assert!(app.current_entry().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn typing_and_saving_creates_an_entry_for_an_empty_day(mut app: App) {
        let backend = FakeBackend::default();
        app.select_date(may(10));
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.focus, Focus::Title);
        type_str(&mut app, "Hike");
        app.handle_key(press(KeyCode::Enter));
        type_str(&mut app, "Long walk");

        let command = app.handle_key(ctrl('s'));
        assert!(matches!(command, Some(Command::Save(_))));
        assert_eq!(app.status_line(), "Saving...");
        drive(&mut app, &backend, command).await;

        let saved = app.current_entry().unwrap();
        assert_eq!(saved.title, "Hike");
        assert_eq!(saved.content, "Long walk");
        assert_eq!(app.store.len(), 3);
        assert_eq!(app.status_line(), "Saved");
        assert!(app.month_view().days[9].has_entry);
        assert_eq!(app.month_view().journaled(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_save_is_reported_and_can_be_retried(mut app: App) {
        let backend = FakeBackend::default();
        backend.fail.set(true);
        app.focus = Focus::Title;
        type_str(&mut app, "!");

        let command = app.handle_key(ctrl('s'));
        drive(&mut app, &backend, command).await;
        assert!(app.status_line().starts_with("Save failed"));
        assert_eq!(app.current_entry().unwrap().title, "Work");

        backend.fail.set(false);
        let command = app.handle_key(ctrl('s'));
        drive(&mut app, &backend, command).await;
        assert_eq!(app.current_entry().unwrap().title, "Work!");
        assert_eq!(app.store.len(), 2);
    }

    #[rstest]
    fn search_filters_and_jumps_to_the_hit(mut app: App) {
        app.handle_key(press(KeyCode::Char('/')));
        assert_eq!(app.focus, Focus::Search);
        type_str(&mut app, "SUN");
        let hits: Vec<_> = app.search_results().iter().map(|e| e.title.clone()).collect();
        assert_eq!(hits, vec!["Beach".to_string()]);
        // Searching alone does not move the editor.
        assert_eq!(app.editor.title.value(), "Work");

        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.selected, may(1));
        assert_eq!(app.editor.title.value(), "Beach");
    }

    #[rstest]
    fn empty_search_lists_nothing(app: App) {
        assert!(app.search_results().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn uploaded_image_is_saved_with_the_entry(mut app: App) {
        let backend = FakeBackend::default();
        let path = std::env::temp_dir().join(format!("journal-app-{}.png", std::process::id()));
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        app.focus = Focus::Images;
        app.handle_key(press(KeyCode::Char('a')));
        assert_eq!(app.focus, Focus::ImagePath);
        type_str(&mut app, path.to_str().unwrap());
        let command = app.handle_key(press(KeyCode::Enter));
        assert!(matches!(command, Some(Command::Upload(_))));
        assert!(app.status_line().contains("Uploading 1 image(s)"));
        drive(&mut app, &backend, command).await;
        std::fs::remove_file(&path).ok();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(app.editor.attachments.images(), [format!("mem://{name}")]);

        let command = app.handle_key(ctrl('s'));
        drive(&mut app, &backend, command).await;
        assert_eq!(app.current_entry().unwrap().images.len(), 1);

        app.focus = Focus::Images;
        app.handle_key(press(KeyCode::Char('d')));
        assert!(app.editor.attachments.images().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn upload_finishing_on_another_day_is_dropped(mut app: App) {
        let backend = FakeBackend::default();
        let path = std::env::temp_dir().join(format!("journal-late-{}.png", std::process::id()));
        std::fs::write(&path, [1, 2, 3]).unwrap();

        let command = app.request_upload(path.to_str().unwrap()).unwrap();
        app.select_date(may(20));
        drive(&mut app, &backend, Some(command)).await;
        std::fs::remove_file(&path).ok();

        assert!(app.editor.attachments.images().is_empty());
        assert!(app.status_line().contains("was not attached"));
    }

    #[rstest]
    #[tokio::test]
    async fn upload_finishing_after_its_day_is_reopened_is_attached(mut app: App) {
        let backend = FakeBackend::default();
        let path = std::env::temp_dir().join(format!("journal-back-{}.png", std::process::id()));
        std::fs::write(&path, [1, 2, 3]).unwrap();

        let command = app.request_upload(path.to_str().unwrap()).unwrap();
        app.select_date(may(3));
        app.select_date(may(2));
        assert_eq!(app.editor.attachments.pending().count(), 0);
        drive(&mut app, &backend, Some(command)).await;
        std::fs::remove_file(&path).ok();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(app.editor.attachments.images(), [format!("mem://{name}")]);
        assert_eq!(app.editor.attachments.last_status(), Some(&RequestStatus::Succeeded));

        let command = app.handle_key(ctrl('s'));
        drive(&mut app, &backend, command).await;
        assert_eq!(app.current_entry().unwrap().images.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_upload_after_its_day_is_reopened_is_reported(mut app: App) {
        let backend = FakeBackend::default();
        backend.fail_uploads.set(true);
        let path = std::env::temp_dir().join(format!("journal-back-fail-{}.png", std::process::id()));
        std::fs::write(&path, [1, 2, 3]).unwrap();

        let command = app.request_upload(path.to_str().unwrap()).unwrap();
        app.select_date(may(3));
        app.select_date(may(2));
        drive(&mut app, &backend, Some(command)).await;
        std::fs::remove_file(&path).ok();

        assert!(app.editor.attachments.images().is_empty());
        assert!(app.status_line().contains("Upload failed"));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_draft_survives_leaving_and_returning(mut app: App) {
        let backend = FakeBackend::default();
        backend.fail.set(true);
        app.focus = Focus::Title;
        type_str(&mut app, "!");
        let command = app.handle_key(ctrl('s'));
        drive(&mut app, &backend, command).await;

        app.select_date(may(3));
        assert_eq!(app.editor.title.value(), "");
        app.select_date(may(2));
        assert_eq!(app.editor.title.value(), "Work!");
        assert!(app.status_line().starts_with("Save failed"));

        backend.fail.set(false);
        let command = app.handle_key(ctrl('s'));
        drive(&mut app, &backend, command).await;
        assert_eq!(app.current_entry().unwrap().title, "Work!");
        assert_eq!(app.status_line(), "Saved");

        app.select_date(may(3));
        app.select_date(may(2));
        assert_eq!(app.editor.title.value(), "Work!");
    }

    #[rstest]
    #[tokio::test]
    async fn notes_tab_saves_quick_notes(mut app: App) {
        let backend = FakeBackend::default();
        app.handle_key(press(KeyCode::F(2)));
        assert_eq!(app.tab, Tab::Notes);
        assert!(app.handle_key(ctrl('s')).is_none());
        app.message = None;

        type_str(&mut app, "Groceries");
        app.handle_key(press(KeyCode::Enter));
        type_str(&mut app, "milk");
        let command = app.handle_key(ctrl('s'));
        drive(&mut app, &backend, command).await;

        assert_eq!(app.notes.len(), 1);
        assert_eq!(app.notes[0].title, "Groceries");
        assert_eq!(app.note_editor.title.value(), "");
        assert_eq!(app.status_line(), "Note saved");
    }

    #[rstest]
    fn calendar_marks_follow_the_store(app: App) {
        let marks = app.store.days_with_entries();
        assert!(marks.contains_key(&DateKey::from_day(may(1))));
        assert_eq!(app.month_view().journaled(), 2);
        assert_eq!(app.month_view().days.len(), 31);
    }

    #[rstest]
    fn quit_keys(mut app: App) {
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
