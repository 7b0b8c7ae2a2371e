//! Remote API layer: session state, the HTTP client for the fixed Days API
//! contract, and the repository that tries remote calendar CRUD first and
//! falls back to local storage on any failure.
//!
//! Day-color, settings, reset, and backup operations never go remote; the
//! API has no endpoints for them.

pub mod client;
pub mod repository;
pub mod session;
pub mod types;

pub use client::{ApiCalendar, ApiClient, ApiUser, LoginResponse};
pub use repository::RemoteRepository;
pub use session::{AuthState, SessionManager, SessionUser};
pub use types::SyncResult;
