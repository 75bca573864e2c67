pub mod app;
pub mod attachments;
pub mod backend;
pub mod calendar;
pub mod date_key;
pub mod entry_store;
pub mod journal_entry;
pub mod reconciler;
pub mod resolver;
pub mod settings;
pub mod supabase;
pub mod telemetry;
pub mod text_input;
pub mod ui;
