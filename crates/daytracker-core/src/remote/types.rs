//! Shared types for local/remote reconciliation.

/// Result of a reconciliation pass between local and remote storage.
///
/// `Conflict` is part of the declared surface but no resolution policy
/// exists for it yet -- see [`super::RemoteRepository::sync_with_local`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncResult {
    Success,
    Failure(String),
    Conflict(Vec<String>),
}
