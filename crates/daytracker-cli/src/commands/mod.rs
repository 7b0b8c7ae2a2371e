//! CLI subcommand implementations.

pub mod auth;
pub mod calendar;
pub mod data;
pub mod day;
pub mod settings;

use chrono::NaiveDate;
use daytracker_core::{Argb, LocalRepository, RemoteRepository, SessionManager};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Default API endpoint; override with DAYTRACKER_API_URL.
const DEFAULT_API_URL: &str = "http://localhost:8080";

pub fn open_local() -> Result<LocalRepository, Box<dyn std::error::Error>> {
    Ok(LocalRepository::open_default()?)
}

pub fn open_remote() -> Result<RemoteRepository, Box<dyn std::error::Error>> {
    let base_url =
        std::env::var("DAYTRACKER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let session = SessionManager::open_default()?;
    let local = LocalRepository::open_default()?;
    Ok(RemoteRepository::new(base_url, session, local)?)
}

pub fn parse_date(value: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    Ok(NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{value}', expected YYYY-MM-DD"))?)
}

pub fn parse_color(value: &str) -> Result<Argb, Box<dyn std::error::Error>> {
    Ok(value.parse::<Argb>()?)
}
