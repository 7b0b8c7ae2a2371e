//! User session state: JWT token, current user, and the published auth state.
//!
//! The token and user live in their own preference store file, separate from
//! the calendar data. The original app encrypts this store; securing it is
//! out of scope here, so it is a plain file.

use log::warn;
use tokio::sync::watch;

use crate::error::StorageError;
use crate::storage::PrefStore;

const KEY_JWT_TOKEN: &str = "jwt_token";
const KEY_USER_ID: &str = "user_id";
const KEY_USER_EMAIL: &str = "user_email";
const KEY_USER_CREATED_AT: &str = "user_created_at";

/// The authenticated user as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

/// Published authentication state (replay-of-one watch channel).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Loading,
    Authenticated,
    Error(String),
}

/// Owns the persisted session and publishes [`AuthState`] transitions.
pub struct SessionManager {
    store: std::sync::Mutex<PrefStore>,
    state_tx: watch::Sender<AuthState>,
    user_tx: watch::Sender<Option<SessionUser>>,
}

impl SessionManager {
    /// Opens the session store and restores an existing session, if any.
    pub fn open(store: PrefStore) -> Self {
        let restored = Self::restore_user(&store);
        let state = if restored.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        let (state_tx, _) = watch::channel(state);
        let (user_tx, _) = watch::channel(restored);
        Self {
            store: std::sync::Mutex::new(store),
            state_tx,
            user_tx,
        }
    }

    /// Opens the session store under the default data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        let dir = crate::storage::data_dir()?;
        let store = PrefStore::open(dir.join(crate::storage::SESSION_FILE))?;
        Ok(Self::open(store))
    }

    fn restore_user(store: &PrefStore) -> Option<SessionUser> {
        let token = store.get(KEY_JWT_TOKEN)?;
        let id = store.get(KEY_USER_ID)?;
        if token.is_empty() || id.is_empty() {
            return None;
        }
        Some(SessionUser {
            id,
            email: store.get(KEY_USER_EMAIL).unwrap_or_default(),
            created_at: store.get(KEY_USER_CREATED_AT).unwrap_or_default(),
        })
    }

    pub fn auth_token(&self) -> Option<String> {
        let store = self.store.lock().expect("session store lock");
        store.get(KEY_JWT_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.user_tx.borrow().clone()
    }

    /// Persists the session and publishes `Authenticated`.
    pub fn save_session(&self, token: &str, user: &SessionUser) -> Result<(), StorageError> {
        {
            let mut store = self.store.lock().expect("session store lock");
            store.put_many(vec![
                (KEY_JWT_TOKEN.to_string(), token.to_string()),
                (KEY_USER_ID.to_string(), user.id.clone()),
                (KEY_USER_EMAIL.to_string(), user.email.clone()),
                (KEY_USER_CREATED_AT.to_string(), user.created_at.clone()),
            ])?;
        }
        self.user_tx.send_replace(Some(user.clone()));
        self.state_tx.send_replace(AuthState::Authenticated);
        Ok(())
    }

    /// Drops the persisted session and publishes `Unauthenticated`. The
    /// published transition happens even if the file delete fails.
    pub fn clear_session(&self) {
        {
            let mut store = self.store.lock().expect("session store lock");
            if let Err(err) = store.clear() {
                warn!("failed to clear session store: {err}");
            }
        }
        self.user_tx.send_replace(None);
        self.state_tx.send_replace(AuthState::Unauthenticated);
    }

    pub fn set_loading(&self) {
        self.state_tx.send_replace(AuthState::Loading);
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.state_tx.send_replace(AuthState::Error(message.into()));
    }

    pub fn is_authenticated(&self) -> bool {
        *self.state_tx.borrow() == AuthState::Authenticated
    }

    /// Subscribes to auth state transitions (replay-of-one).
    pub fn watch_auth_state(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }
}
