use std::path::PathBuf;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub debug: bool,
    pub log_dir: PathBuf,
    pub supabase: SupabaseSettings,
    pub uploads: UploadSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
    /// Signed-in user's JWT. Falls back to the anon key when absent.
    pub access_token: Option<String>,
    pub entries_table: String,
    pub notes_table: String,
    pub bucket: String,
    /// Restricts the bootstrap queries to one user's rows.
    pub owner_id: Option<String>,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct UploadSettings {
    pub max_bytes: u64,
}

/// Defaults, then `settings/base.yaml` if present, then `JOURNAL_*` variables.
/// E.g. `JOURNAL_SUPABASE__URL=https://xyz.supabase.co` sets `supabase.url`.
pub fn get_settings() -> Result<Settings, config::ConfigError> {
    let settings_directory = std::env::current_dir()
        .map(|dir| dir.join("settings"))
        .unwrap_or_else(|_| PathBuf::from("settings"));
    build(
        config::File::from(settings_directory.join("base.yaml")).required(false),
        environment(),
    )
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("JOURNAL")
        .prefix_separator("_")
        .separator("__")
}

fn build<S>(file: S, env: config::Environment) -> Result<Settings, config::ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    config::Config::builder()
        .set_default("debug", false)?
        .set_default("log_dir", "./logs")?
        .set_default("supabase.entries_table", "journal_entries")?
        .set_default("supabase.notes_table", "notes")?
        .set_default("supabase.bucket", "journal-images")?
        .set_default("uploads.max_bytes", 5 * 1024 * 1024)?
        .add_source(file)
        .add_source(env)
        .build()?
        .try_deserialize::<Settings>()
}
