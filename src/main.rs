use chrono::Local;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::event::{Event, EventStream};
use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{info, warn};

use personal_journal::app::{App, Completion};
use personal_journal::backend::{BlobStore, JournalBackend};
use personal_journal::entry_store::EntryStore;
use personal_journal::supabase::SupabaseClient;
use personal_journal::ui::UI;
use personal_journal::{settings, telemetry};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let settings = settings::get_settings().wrap_err("Failed to read settings")?;
    let _guard = telemetry::init_subscriber(settings.debug, &settings.log_dir)?;

    let client = SupabaseClient::new(&settings.supabase);
    let owner = settings.supabase.owner_id.as_deref();

    let entries = client
        .query_entries(owner)
        .await
        .wrap_err("Failed to load journal entries")?;
    let notes = match client.query_notes(owner).await {
        Ok(notes) => notes,
        Err(e) => {
            warn!(error = %e, "could not load notes, starting with none");
            Vec::new()
        }
    };
    info!(entries = entries.len(), notes = notes.len(), "journal loaded");

    let mut app = App::new(
        EntryStore::from_entries(entries),
        notes,
        Local::now().date_naive(),
        settings.uploads.max_bytes,
    );
    let mut ui = UI::new()?;

    run(&mut ui, &mut app, &client).await
}

/// Single-task event loop: key presses and finished backend calls are
/// handled one at a time, in the order they arrive.
async fn run<C>(ui: &mut UI, app: &mut App, client: &C) -> Result<()>
where
    C: JournalBackend + BlobStore,
{
    let mut events = EventStream::new();
    let mut in_flight: FuturesUnordered<LocalBoxFuture<'_, Completion>> = FuturesUnordered::new();

    while !app.should_quit {
        ui.display(app)?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(command) = app.handle_key(key) {
                        in_flight.push(command.run(client));
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(done) = in_flight.next(), if !in_flight.is_empty() => {
                if let Some(command) = app.on_completion(done) {
                    in_flight.push(command.run(client));
                }
            }
        }
    }

    if !in_flight.is_empty() {
        info!(count = in_flight.len(), "waiting for running saves before exit");
    }
    while let Some(done) = in_flight.next().await {
        if let Some(command) = app.on_completion(done) {
            in_flight.push(command.run(client));
        }
    }

    Ok(())
}
