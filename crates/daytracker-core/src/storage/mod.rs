//! Persistence layer: the textual key-value store, the serialization codec,
//! and the local repository that owns the persisted document.

pub mod codec;
mod local;
mod prefs;

pub use local::{DayColorTarget, LocalRepository};
pub use prefs::PrefStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Store key for the global [`crate::AppSettings`] blob.
pub const KEY_SETTINGS: &str = "app_settings";
/// Store key for the legacy flat day list (pre-multi-calendar).
pub const KEY_COLORED_DAYS: &str = "colored_days";
/// Store key for the multi-calendar document.
pub const KEY_CALENDAR_DATA: &str = "calendar_data";

/// File name of the main preference store under [`data_dir`].
pub const PREFS_FILE: &str = "day_tracker_prefs.json";
/// File name of the session store under [`data_dir`].
pub const SESSION_FILE: &str = "user_session.json";

/// Returns `~/.config/daytracker[-dev]/` based on DAYTRACKER_ENV.
///
/// Set DAYTRACKER_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYTRACKER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("daytracker-dev")
    } else {
        base_dir.join("daytracker")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DirFailed {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
