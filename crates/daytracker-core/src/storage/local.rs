//! The local repository: sole owner of the persisted document.
//!
//! Every mutation is a whole-document read-modify-write against the
//! preference store, serialized behind an async mutex so concurrent callers
//! cannot interleave and silently drop each other's writes. After a
//! successful write the new value is republished on a watch channel
//! (replay-of-one: subscribers get the current value plus subsequent
//! updates, never a backlog).
//!
//! Corruption on any read path self-heals: the corrupt key is deleted and a
//! default substituted. Write failures surface as [`StorageError`] and leave
//! both the store and the published state at their pre-operation values.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::warn;
use tokio::sync::{watch, Mutex};

use super::{codec, PrefStore, KEY_CALENDAR_DATA, KEY_COLORED_DAYS, KEY_SETTINGS, PREFS_FILE};
use crate::error::{DaysError, Result, ValidationError};
use crate::model::{default_colors, AppSettings, Argb, Calendar, CalendarData, Day};

/// Where a day-color operation lands when the caller names no calendar:
/// the currently selected calendar when one exists, otherwise the legacy
/// flat store kept for pre-multi-calendar data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayColorTarget {
    PerCalendar(String),
    LegacyFlat,
}

/// Local persistence repository over a [`PrefStore`].
pub struct LocalRepository {
    store: Mutex<PrefStore>,
    settings_tx: watch::Sender<AppSettings>,
    calendar_tx: watch::Sender<CalendarData>,
}

impl LocalRepository {
    /// Opens the repository: loads settings, runs the one-time legacy
    /// migration, loads the document, and seeds both watch channels.
    ///
    /// Operations cannot observe a partially-migrated state because the
    /// repository value does not exist until this returns.
    pub fn open(store: PrefStore) -> Self {
        let mut store = store;
        let settings = Self::read_settings(&mut store);
        Self::migrate_legacy_data(&mut store, &settings);
        let data = Self::read_calendar_data(&mut store);

        let (settings_tx, _) = watch::channel(settings);
        let (calendar_tx, _) = watch::channel(data);
        Self {
            store: Mutex::new(store),
            settings_tx,
            calendar_tx,
        }
    }

    /// Opens the repository over the default store under [`super::data_dir`].
    pub fn open_default() -> Result<Self> {
        let dir = super::data_dir()?;
        let store = PrefStore::open(dir.join(PREFS_FILE))?;
        Ok(Self::open(store))
    }

    // ---- calendar operations ----

    /// Upserts a calendar by id: replaces an existing entry in place, else
    /// appends. A blank name is rejected before any persistence attempt.
    pub async fn save_calendar(&self, calendar: Calendar) -> Result<()> {
        if calendar.name.trim().is_empty() {
            return Err(ValidationError::invalid("name", "calendar name must not be blank").into());
        }
        let mut store = self.store.lock().await;
        let mut data = Self::read_calendar_data(&mut store);
        match data.calendars.iter_mut().find(|c| c.id == calendar.id) {
            Some(slot) => *slot = calendar,
            None => data.calendars.push(calendar),
        }
        self.write_calendar_data(&mut store, data)
    }

    /// Removes a calendar and its day list. If the deleted calendar was
    /// selected, selection moves to the first remaining calendar, or clears
    /// when none remain.
    pub async fn delete_calendar(&self, calendar_id: &str) -> Result<()> {
        let mut store = self.store.lock().await;
        let mut data = Self::read_calendar_data(&mut store);
        data.calendars.retain(|c| c.id != calendar_id);
        data.calendar_days.remove(calendar_id);
        if data.selected_calendar_id.as_deref() == Some(calendar_id) {
            data.selected_calendar_id = data.calendars.first().map(|c| c.id.clone());
        }
        let selected = data.selected_calendar_id.clone();
        for c in &mut data.calendars {
            c.is_selected = Some(c.id.as_str()) == selected.as_deref();
        }
        self.write_calendar_data(&mut store, data)
    }

    /// Snapshot of the calendars in document order.
    pub async fn calendars(&self) -> Vec<Calendar> {
        let mut store = self.store.lock().await;
        Self::read_calendar_data(&mut store).calendars
    }

    pub async fn calendar(&self, calendar_id: &str) -> Option<Calendar> {
        let mut store = self.store.lock().await;
        Self::read_calendar_data(&mut store)
            .calendars
            .into_iter()
            .find(|c| c.id == calendar_id)
    }

    /// Sets the selection pointer and realigns every calendar's denormalized
    /// `is_selected` flag with it.
    pub async fn set_selected_calendar(&self, calendar_id: &str) -> Result<()> {
        let mut store = self.store.lock().await;
        let mut data = Self::read_calendar_data(&mut store);
        if !data.calendars.iter().any(|c| c.id == calendar_id) {
            return Err(
                ValidationError::invalid("calendarId", "no calendar with this id exists").into(),
            );
        }
        for c in &mut data.calendars {
            c.is_selected = c.id == calendar_id;
        }
        data.selected_calendar_id = Some(calendar_id.to_string());
        self.write_calendar_data(&mut store, data)
    }

    pub async fn selected_calendar(&self) -> Option<Calendar> {
        let mut store = self.store.lock().await;
        Self::read_calendar_data(&mut store).selected_calendar().cloned()
    }

    /// Snapshot of the whole document.
    pub async fn calendar_data(&self) -> CalendarData {
        let mut store = self.store.lock().await;
        Self::read_calendar_data(&mut store)
    }

    /// Subscribes to document changes. The receiver immediately holds the
    /// current value.
    pub fn watch_calendar_data(&self) -> watch::Receiver<CalendarData> {
        self.calendar_tx.subscribe()
    }

    // ---- per-calendar day-color operations ----

    /// Colors a date within the named calendar, replacing any prior entry
    /// for the same date.
    pub async fn save_day_color(&self, calendar_id: &str, date: NaiveDate, color: Argb) -> Result<()> {
        let mut store = self.store.lock().await;
        self.save_day_color_in(&mut store, calendar_id, date, color)
    }

    pub async fn remove_day_color(&self, calendar_id: &str, date: NaiveDate) -> Result<()> {
        let mut store = self.store.lock().await;
        self.remove_day_color_in(&mut store, calendar_id, date)
    }

    pub async fn day_color(&self, calendar_id: &str, date: NaiveDate) -> Option<Argb> {
        let mut store = self.store.lock().await;
        Self::read_calendar_data(&mut store)
            .days_for(calendar_id)
            .iter()
            .find(|d| d.date == date)
            .map(|d| d.color)
    }

    /// Snapshot of the named calendar's colored days.
    pub async fn colored_days(&self, calendar_id: &str) -> BTreeMap<NaiveDate, Argb> {
        let mut store = self.store.lock().await;
        Self::read_calendar_data(&mut store)
            .days_for(calendar_id)
            .iter()
            .map(|d| (d.date, d.color))
            .collect()
    }

    /// Empties the day list of the named calendar only.
    pub async fn clear_day_colors(&self, calendar_id: &str) -> Result<()> {
        let mut store = self.store.lock().await;
        let mut data = Self::read_calendar_data(&mut store);
        data.calendar_days.insert(calendar_id.to_string(), Vec::new());
        self.write_calendar_data(&mut store, data)
    }

    /// Replaces the named calendar's day list wholesale.
    pub async fn save_day_colors(
        &self,
        calendar_id: &str,
        day_colors: BTreeMap<NaiveDate, Argb>,
    ) -> Result<()> {
        let mut store = self.store.lock().await;
        self.save_day_colors_in(&mut store, calendar_id, day_colors)
    }

    // ---- current-scope day-color operations ----
    //
    // These resolve a DayColorTarget once per call: the selected calendar
    // when one exists, else the legacy flat store. The two-tier fallback is
    // load-bearing for installs that never migrated.

    pub async fn save_day_color_current(&self, date: NaiveDate, color: Argb) -> Result<()> {
        let mut store = self.store.lock().await;
        match Self::resolve_target(&Self::read_calendar_data(&mut store)) {
            DayColorTarget::PerCalendar(id) => self.save_day_color_in(&mut store, &id, date, color),
            DayColorTarget::LegacyFlat => {
                let mut days = Self::read_legacy_days_map(&mut store);
                days.insert(date, color);
                Self::write_legacy_days(&mut store, &days)
            }
        }
    }

    pub async fn remove_day_color_current(&self, date: NaiveDate) -> Result<()> {
        let mut store = self.store.lock().await;
        match Self::resolve_target(&Self::read_calendar_data(&mut store)) {
            DayColorTarget::PerCalendar(id) => self.remove_day_color_in(&mut store, &id, date),
            DayColorTarget::LegacyFlat => {
                let mut days = Self::read_legacy_days_map(&mut store);
                days.remove(&date);
                Self::write_legacy_days(&mut store, &days)
            }
        }
    }

    pub async fn day_color_current(&self, date: NaiveDate) -> Option<Argb> {
        let mut store = self.store.lock().await;
        let data = Self::read_calendar_data(&mut store);
        match Self::resolve_target(&data) {
            DayColorTarget::PerCalendar(id) => data
                .days_for(&id)
                .iter()
                .find(|d| d.date == date)
                .map(|d| d.color),
            DayColorTarget::LegacyFlat => {
                Self::read_legacy_days_map(&mut store).get(&date).copied()
            }
        }
    }

    pub async fn colored_days_current(&self) -> BTreeMap<NaiveDate, Argb> {
        let mut store = self.store.lock().await;
        Self::colored_days_current_in(&mut store)
    }

    pub async fn clear_day_colors_current(&self) -> Result<()> {
        let mut store = self.store.lock().await;
        match Self::resolve_target(&Self::read_calendar_data(&mut store)) {
            DayColorTarget::PerCalendar(id) => {
                let mut data = Self::read_calendar_data(&mut store);
                data.calendar_days.insert(id, Vec::new());
                self.write_calendar_data(&mut store, data)
            }
            DayColorTarget::LegacyFlat => {
                store.remove(KEY_COLORED_DAYS).map_err(DaysError::from)
            }
        }
    }

    pub async fn save_day_colors_current(&self, day_colors: BTreeMap<NaiveDate, Argb>) -> Result<()> {
        let mut store = self.store.lock().await;
        match Self::resolve_target(&Self::read_calendar_data(&mut store)) {
            DayColorTarget::PerCalendar(id) => self.save_day_colors_in(&mut store, &id, day_colors),
            DayColorTarget::LegacyFlat => Self::write_legacy_days(&mut store, &day_colors),
        }
    }

    // ---- settings ----

    pub async fn save_settings(&self, settings: AppSettings) -> Result<()> {
        let mut store = self.store.lock().await;
        store.put(KEY_SETTINGS, codec::encode_settings(&settings))?;
        self.settings_tx.send_replace(settings);
        Ok(())
    }

    pub async fn settings(&self) -> AppSettings {
        let mut store = self.store.lock().await;
        Self::read_settings(&mut store)
    }

    /// Subscribes to settings changes (replay-of-one).
    pub fn watch_settings(&self) -> watch::Receiver<AppSettings> {
        self.settings_tx.subscribe()
    }

    // ---- data management ----

    /// Clears the entire store (document, settings, legacy blob) and
    /// republishes defaults.
    pub async fn reset_all_data(&self) -> Result<()> {
        let mut store = self.store.lock().await;
        store.clear()?;
        self.settings_tx.send_replace(AppSettings::default());
        self.calendar_tx.send_replace(CalendarData::default());
        Ok(())
    }

    /// Serializes current settings plus current-scope colored days into the
    /// user-facing backup form.
    pub async fn export_data(&self) -> Result<String> {
        let mut store = self.store.lock().await;
        let settings = Self::read_settings(&mut store);
        let days = Self::colored_days_current_in(&mut store);
        Ok(codec::encode_backup(&settings, &days))
    }

    /// Restores a backup produced by [`Self::export_data`]. All-or-nothing:
    /// on any decode or apply failure, returns false without touching the
    /// store.
    pub async fn import_data(&self, text: &str) -> bool {
        let (settings, days) = match codec::decode_backup(text) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!("import rejected, backup did not decode: {err}");
                return false;
            }
        };

        let mut store = self.store.lock().await;
        let mut updates = vec![(KEY_SETTINGS.to_string(), codec::encode_settings(&settings))];
        let data = Self::read_calendar_data(&mut store);
        let new_data = match Self::resolve_target(&data) {
            DayColorTarget::PerCalendar(id) => {
                let mut new_data = data;
                new_data.calendar_days.insert(
                    id,
                    days.iter().map(|(&date, &color)| Day::new(date, color)).collect(),
                );
                updates.push((
                    KEY_CALENDAR_DATA.to_string(),
                    codec::encode_calendar_data(&new_data, Some(&settings)),
                ));
                Some(new_data)
            }
            DayColorTarget::LegacyFlat => {
                updates.push((KEY_COLORED_DAYS.to_string(), codec::encode_legacy_days(&days)));
                None
            }
        };

        if let Err(err) = store.put_many(updates) {
            warn!("import failed to persist, nothing applied: {err}");
            return false;
        }
        self.settings_tx.send_replace(settings);
        if let Some(new_data) = new_data {
            self.calendar_tx.send_replace(new_data);
        }
        true
    }

    // ---- internals ----

    fn resolve_target(data: &CalendarData) -> DayColorTarget {
        match data.selected_calendar() {
            Some(calendar) => DayColorTarget::PerCalendar(calendar.id.clone()),
            None => DayColorTarget::LegacyFlat,
        }
    }

    fn save_day_color_in(
        &self,
        store: &mut PrefStore,
        calendar_id: &str,
        date: NaiveDate,
        color: Argb,
    ) -> Result<()> {
        let mut data = Self::read_calendar_data(store);
        let days = data.calendar_days.entry(calendar_id.to_string()).or_default();
        days.retain(|d| d.date != date);
        days.push(Day::new(date, color));
        self.write_calendar_data(store, data)
    }

    fn remove_day_color_in(
        &self,
        store: &mut PrefStore,
        calendar_id: &str,
        date: NaiveDate,
    ) -> Result<()> {
        let mut data = Self::read_calendar_data(store);
        let days = data.calendar_days.entry(calendar_id.to_string()).or_default();
        days.retain(|d| d.date != date);
        self.write_calendar_data(store, data)
    }

    fn save_day_colors_in(
        &self,
        store: &mut PrefStore,
        calendar_id: &str,
        day_colors: BTreeMap<NaiveDate, Argb>,
    ) -> Result<()> {
        let mut data = Self::read_calendar_data(store);
        data.calendar_days.insert(
            calendar_id.to_string(),
            day_colors
                .iter()
                .map(|(&date, &color)| Day::new(date, color))
                .collect(),
        );
        self.write_calendar_data(store, data)
    }

    fn colored_days_current_in(store: &mut PrefStore) -> BTreeMap<NaiveDate, Argb> {
        let data = Self::read_calendar_data(store);
        match Self::resolve_target(&data) {
            DayColorTarget::PerCalendar(id) => data
                .days_for(&id)
                .iter()
                .map(|d| (d.date, d.color))
                .collect(),
            DayColorTarget::LegacyFlat => Self::read_legacy_days_map(store),
        }
    }

    /// Persists the document (with an embedded settings copy) and publishes
    /// it. The publish only happens after the write succeeded, so observers
    /// never see state that was not persisted.
    fn write_calendar_data(&self, store: &mut PrefStore, data: CalendarData) -> Result<()> {
        let settings = Self::read_settings(store);
        store.put(KEY_CALENDAR_DATA, codec::encode_calendar_data(&data, Some(&settings)))?;
        self.calendar_tx.send_replace(data);
        Ok(())
    }

    fn write_legacy_days(store: &mut PrefStore, days: &BTreeMap<NaiveDate, Argb>) -> Result<()> {
        store
            .put(KEY_COLORED_DAYS, codec::encode_legacy_days(days))
            .map_err(DaysError::from)
    }

    fn read_settings(store: &mut PrefStore) -> AppSettings {
        match store.get(KEY_SETTINGS) {
            None => AppSettings::default(),
            Some(text) => match codec::decode_settings(&text) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("discarding corrupt settings blob: {err}");
                    let _ = store.remove(KEY_SETTINGS);
                    AppSettings::default()
                }
            },
        }
    }

    fn read_calendar_data(store: &mut PrefStore) -> CalendarData {
        match store.get(KEY_CALENDAR_DATA) {
            None => CalendarData::default(),
            Some(text) => match codec::decode_calendar_data(&text) {
                Ok(data) => data,
                Err(err) => {
                    warn!("discarding corrupt calendar document: {err}");
                    let _ = store.remove(KEY_CALENDAR_DATA);
                    CalendarData::default()
                }
            },
        }
    }

    fn read_legacy_days_map(store: &mut PrefStore) -> BTreeMap<NaiveDate, Argb> {
        match store.get(KEY_COLORED_DAYS) {
            None => BTreeMap::new(),
            Some(text) => match codec::decode_legacy_days(&text) {
                Ok(days) => days.into_iter().map(|d| (d.date, d.color)).collect(),
                Err(err) => {
                    warn!("discarding corrupt legacy day list: {err}");
                    let _ = store.remove(KEY_COLORED_DAYS);
                    BTreeMap::new()
                }
            },
        }
    }

    /// One-time conversion of the legacy flat store into a document with a
    /// single synthesized default calendar. Idempotent: a document that
    /// already has calendars is left alone. Best-effort: any failure is
    /// logged and swallowed, and the repository proceeds with an empty
    /// document.
    fn migrate_legacy_data(store: &mut PrefStore, settings: &AppSettings) {
        let result = (|| -> Result<()> {
            let existing = Self::read_calendar_data(store);
            if !existing.calendars.is_empty() {
                return Ok(());
            }

            let legacy_days = Self::read_legacy_days_map(store);
            if legacy_days.is_empty() && settings.available_colors.is_empty() {
                return Ok(());
            }

            let palette = if settings.available_colors.is_empty() {
                default_colors()
            } else {
                settings.available_colors.clone()
            };
            let calendar = Calendar::create_default("My Calendar", palette);

            let mut data = CalendarData {
                selected_calendar_id: Some(calendar.id.clone()),
                ..CalendarData::default()
            };
            if !legacy_days.is_empty() {
                data.calendar_days.insert(
                    calendar.id.clone(),
                    legacy_days
                        .iter()
                        .map(|(&date, &color)| Day::new(date, color))
                        .collect(),
                );
            }
            data.calendars.push(calendar);

            store.put(KEY_CALENDAR_DATA, codec::encode_calendar_data(&data, Some(settings)))?;
            if !legacy_days.is_empty() {
                store.remove(KEY_COLORED_DAYS)?;
            }
            Ok(())
        })();

        if let Err(err) = result {
            warn!("legacy data migration failed, continuing without it: {err}");
        }
    }
}
