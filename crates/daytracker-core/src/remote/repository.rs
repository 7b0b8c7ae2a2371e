//! Repository that consults the Days API first and falls back to local
//! storage when the remote side fails.
//!
//! Only calendar CRUD ever goes remote. The fallback is deliberate and
//! total: any transport failure or non-2xx status routes the operation to
//! [`LocalRepository`], and the caller only sees the end result. Note the
//! consequence (inherited from the original design): a transient remote
//! failure diverges remote and local state with no reconciliation -- see
//! [`Self::sync_with_local`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;
use tokio::sync::watch;
use uuid::Uuid;

use super::client::{ApiCalendar, ApiClient};
use super::session::{SessionManager, SessionUser};
use super::types::SyncResult;
use crate::error::{DaysError, Result, ValidationError};
use crate::model::{default_colors, AppSettings, Argb, Calendar, CalendarData};
use crate::storage::LocalRepository;

const CALENDAR_DESCRIPTION: &str = "Calendar created from Day Tracker";

/// Remote-first repository with automatic local fallback.
pub struct RemoteRepository {
    client: ApiClient,
    session: SessionManager,
    local: LocalRepository,
}

impl RemoteRepository {
    /// Wraps a local repository with the remote API at `base_url`, seeding
    /// the client token from any restored session.
    pub fn new(
        base_url: impl Into<String>,
        session: SessionManager,
        local: LocalRepository,
    ) -> Result<Self> {
        let client = ApiClient::new(base_url, session.auth_token())?;
        Ok(Self {
            client,
            session,
            local,
        })
    }

    pub fn local(&self) -> &LocalRepository {
        &self.local
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    // ---- authentication ----

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser> {
        validate_credentials(email, password)?;
        self.session.set_loading();
        match self.client.login(email, password).await {
            Ok(response) => {
                let user = SessionUser {
                    id: response.user.id,
                    email: response.user.email,
                    created_at: response.user.created_at,
                };
                self.session.save_session(&response.token, &user)?;
                self.client.set_token(Some(response.token));
                Ok(user)
            }
            Err(err) => {
                self.session.set_error(format!("Login failed: {err}"));
                Err(err.into())
            }
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<SessionUser> {
        validate_credentials(email, password)?;
        self.session.set_loading();
        match self.client.create_user(email, password).await {
            Ok(user) => {
                // Registration does not log the user in; the session stays
                // unauthenticated until an explicit login.
                self.session.clear_session();
                Ok(SessionUser {
                    id: user.id,
                    email: user.email,
                    created_at: user.created_at,
                })
            }
            Err(err) => {
                self.session.set_error(format!("Registration failed: {err}"));
                Err(err.into())
            }
        }
    }

    pub fn logout(&self) {
        self.session.clear_session();
        self.client.set_token(None);
    }

    // ---- calendar operations (remote-first) ----

    /// Upserts a calendar: an id already present locally goes out as an
    /// update (PUT), a new one as a create (POST). Either way a remote
    /// failure falls back to the local upsert.
    pub async fn save_calendar(&self, calendar: Calendar) -> Result<()> {
        let known = self.local.calendar(&calendar.id).await.is_some();
        let remote = if known {
            self.client
                .update_calendar(&calendar.id, &calendar.name, Some(CALENDAR_DESCRIPTION))
                .await
                .map(|_| ())
        } else {
            self.client
                .create_calendar(&calendar.name, Some(CALENDAR_DESCRIPTION))
                .await
                .map(|_| ())
        };
        match remote {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!("remote saveCalendar failed, falling back to local: {err}");
                self.local.save_calendar(calendar).await
            }
        }
    }

    pub async fn delete_calendar(&self, calendar_id: &str) -> Result<()> {
        match self.client.delete_calendar(calendar_id).await {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!("remote deleteCalendar failed, falling back to local: {err}");
                self.local.delete_calendar(calendar_id).await
            }
        }
    }

    pub async fn calendars(&self) -> Vec<Calendar> {
        match self.client.calendars().await {
            Ok(remote) => remote.into_iter().map(from_api_calendar).collect(),
            Err(err) => {
                debug!("remote getCalendars failed, falling back to local: {err}");
                self.local.calendars().await
            }
        }
    }

    pub async fn calendar(&self, calendar_id: &str) -> Option<Calendar> {
        match self.client.calendar(calendar_id).await {
            Ok(remote) => Some(from_api_calendar(remote)),
            Err(err) => {
                debug!("remote getCalendar failed, falling back to local: {err}");
                self.local.calendar(calendar_id).await
            }
        }
    }

    // ---- selection, day colors, settings: always local ----

    pub async fn set_selected_calendar(&self, calendar_id: &str) -> Result<()> {
        self.local.set_selected_calendar(calendar_id).await
    }

    pub async fn selected_calendar(&self) -> Option<Calendar> {
        self.local.selected_calendar().await
    }

    pub async fn calendar_data(&self) -> CalendarData {
        self.local.calendar_data().await
    }

    pub fn watch_calendar_data(&self) -> watch::Receiver<CalendarData> {
        self.local.watch_calendar_data()
    }

    pub async fn save_day_color(&self, calendar_id: &str, date: NaiveDate, color: Argb) -> Result<()> {
        self.local.save_day_color(calendar_id, date, color).await
    }

    pub async fn remove_day_color(&self, calendar_id: &str, date: NaiveDate) -> Result<()> {
        self.local.remove_day_color(calendar_id, date).await
    }

    pub async fn day_color(&self, calendar_id: &str, date: NaiveDate) -> Option<Argb> {
        self.local.day_color(calendar_id, date).await
    }

    pub async fn colored_days(&self, calendar_id: &str) -> BTreeMap<NaiveDate, Argb> {
        self.local.colored_days(calendar_id).await
    }

    pub async fn clear_day_colors(&self, calendar_id: &str) -> Result<()> {
        self.local.clear_day_colors(calendar_id).await
    }

    pub async fn save_day_colors(
        &self,
        calendar_id: &str,
        day_colors: BTreeMap<NaiveDate, Argb>,
    ) -> Result<()> {
        self.local.save_day_colors(calendar_id, day_colors).await
    }

    pub async fn save_day_color_current(&self, date: NaiveDate, color: Argb) -> Result<()> {
        self.local.save_day_color_current(date, color).await
    }

    pub async fn remove_day_color_current(&self, date: NaiveDate) -> Result<()> {
        self.local.remove_day_color_current(date).await
    }

    pub async fn day_color_current(&self, date: NaiveDate) -> Option<Argb> {
        self.local.day_color_current(date).await
    }

    pub async fn colored_days_current(&self) -> BTreeMap<NaiveDate, Argb> {
        self.local.colored_days_current().await
    }

    pub async fn clear_day_colors_current(&self) -> Result<()> {
        self.local.clear_day_colors_current().await
    }

    pub async fn save_day_colors_current(&self, day_colors: BTreeMap<NaiveDate, Argb>) -> Result<()> {
        self.local.save_day_colors_current(day_colors).await
    }

    pub async fn save_settings(&self, settings: AppSettings) -> Result<()> {
        self.local.save_settings(settings).await
    }

    pub async fn settings(&self) -> AppSettings {
        self.local.settings().await
    }

    pub fn watch_settings(&self) -> watch::Receiver<AppSettings> {
        self.local.watch_settings()
    }

    pub async fn export_data(&self) -> Result<String> {
        self.local.export_data().await
    }

    pub async fn import_data(&self, text: &str) -> bool {
        self.local.import_data(text).await
    }

    /// Clears local data and the session.
    pub async fn reset_all_data(&self) -> Result<()> {
        self.local.reset_all_data().await?;
        self.session.clear_session();
        Ok(())
    }

    /// Reconciliation between local and remote state.
    ///
    /// Not implemented: no conflict resolution policy is defined anywhere in
    /// the system, so rather than guess one this reports failure outright.
    pub async fn sync_with_local(&self) -> SyncResult {
        SyncResult::Failure("no conflict resolution policy is defined".to_string())
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), DaysError> {
    if email.trim().is_empty() {
        return Err(ValidationError::invalid("email", "must not be blank").into());
    }
    if password.is_empty() {
        return Err(ValidationError::invalid("password", "must not be empty").into());
    }
    Ok(())
}

/// Maps an API calendar onto the local model. The API carries no palette,
/// so remote calendars surface with the built-in one.
fn from_api_calendar(remote: ApiCalendar) -> Calendar {
    Calendar {
        id: if remote.id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            remote.id
        },
        name: if remote.name.is_empty() {
            "Unknown".to_string()
        } else {
            remote.name
        },
        color_scheme: default_colors(),
        is_selected: false,
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}
