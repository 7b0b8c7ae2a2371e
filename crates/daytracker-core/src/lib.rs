//! # Day Tracker Core Library
//!
//! Core business logic for Day Tracker, a calendar-journaling tool that
//! colors individual days with a meaning ("Good Day") and groups colored
//! days into named calendars. The CLI binary and any GUI surface are thin
//! layers over this crate.
//!
//! ## Architecture
//!
//! - **Model**: plain domain entities ([`Calendar`], [`Day`], [`AppSettings`],
//!   the [`CalendarData`] document)
//! - **Storage**: a textual key-value store ([`PrefStore`]), the JSON codec
//!   for the persisted entity graph, and the [`LocalRepository`] that owns
//!   the document, runs the one-time legacy migration, and publishes every
//!   change on watch channels
//! - **Remote**: client for the fixed Days API contract plus the
//!   [`RemoteRepository`] that tries remote calendar CRUD first and falls
//!   back to local storage on any failure
//!
//! ## Key components
//!
//! - [`LocalRepository`]: persistence, migration, export/import
//! - [`RemoteRepository`]: remote-first calendar CRUD with local fallback
//! - [`SessionManager`]: token/user session with published auth state

pub mod error;
pub mod model;
pub mod remote;
pub mod storage;

pub use error::{DaysError, DecodeError, NetworkError, Result, StorageError, ValidationError};
pub use model::{default_colors, AppSettings, Argb, Calendar, CalendarData, ColorMeaning, Day};
pub use remote::{ApiClient, AuthState, RemoteRepository, SessionManager, SessionUser, SyncResult};
pub use storage::{data_dir, DayColorTarget, LocalRepository, PrefStore};
