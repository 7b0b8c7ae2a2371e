//! Repository behavior over a real on-disk store.

use chrono::NaiveDate;
use daytracker_core::storage::{codec, KEY_CALENDAR_DATA, KEY_SETTINGS, PREFS_FILE};
use daytracker_core::{
    default_colors, AppSettings, Argb, Calendar, DaysError, LocalRepository, PrefStore,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open_repo(dir: &tempfile::TempDir) -> LocalRepository {
    let store = PrefStore::open(dir.path().join(PREFS_FILE)).unwrap();
    LocalRepository::open(store)
}

/// Settings whose palette is empty, so opening a fresh store does not
/// synthesize the default calendar.
fn no_palette_settings() -> AppSettings {
    AppSettings {
        available_colors: Vec::new(),
        ..AppSettings::default()
    }
}

fn seed(dir: &tempfile::TempDir, key: &str, value: String) {
    let mut store = PrefStore::open(dir.path().join(PREFS_FILE)).unwrap();
    store.put(key, value).unwrap();
}

fn stored_keys(dir: &tempfile::TempDir) -> Vec<String> {
    let content = std::fs::read_to_string(dir.path().join(PREFS_FILE)).unwrap();
    let map: std::collections::BTreeMap<String, String> = serde_json::from_str(&content).unwrap();
    map.into_keys().collect()
}

#[tokio::test]
async fn fresh_open_synthesizes_a_selected_default_calendar() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);

    let calendars = repo.calendars().await;
    assert_eq!(calendars.len(), 1);
    assert_eq!(calendars[0].name, "My Calendar");
    assert!(calendars[0].is_selected);
    assert_eq!(
        repo.selected_calendar().await.unwrap().id,
        calendars[0].id
    );
}

#[tokio::test]
async fn recoloring_a_date_replaces_the_prior_entry() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);
    let cal = repo.selected_calendar().await.unwrap();

    repo.save_day_color(&cal.id, date(2025, 8, 6), Argb(0xFFE5_3E3E))
        .await
        .unwrap();
    repo.save_day_color(&cal.id, date(2025, 8, 6), Argb(0xFF4C_AF50))
        .await
        .unwrap();

    let days = repo.colored_days(&cal.id).await;
    assert_eq!(days.len(), 1);
    assert_eq!(days[&date(2025, 8, 6)], Argb(0xFF4C_AF50));
}

#[tokio::test]
async fn selection_is_consistent_across_the_denormalized_flags() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);

    let second = Calendar::new("Workouts", default_colors());
    let second_id = second.id.clone();
    repo.save_calendar(second).await.unwrap();
    repo.set_selected_calendar(&second_id).await.unwrap();

    let calendars = repo.calendars().await;
    let selected: Vec<_> = calendars.iter().filter(|c| c.is_selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, second_id);
    assert_eq!(
        repo.calendar_data().await.selected_calendar_id.as_deref(),
        Some(second_id.as_str())
    );
}

#[tokio::test]
async fn deleting_the_selected_calendar_reassigns_selection() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);
    let first = repo.selected_calendar().await.unwrap();

    let second = Calendar::new("B", default_colors());
    let second_id = second.id.clone();
    repo.save_calendar(second).await.unwrap();

    repo.save_day_color(&second_id, date(2025, 1, 2), Argb(0xFF00_00FF))
        .await
        .unwrap();
    repo.delete_calendar(&first.id).await.unwrap();

    let data = repo.calendar_data().await;
    assert_eq!(data.selected_calendar_id.as_deref(), Some(second_id.as_str()));
    assert!(data.calendars.iter().all(|c| c.is_selected == (c.id == second_id)));
    // current-scope reads now resolve against the survivor
    assert_eq!(
        repo.colored_days_current().await[&date(2025, 1, 2)],
        Argb(0xFF00_00FF)
    );
}

#[tokio::test]
async fn deleting_the_last_calendar_clears_selection() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);
    let only = repo.selected_calendar().await.unwrap();
    repo.save_day_color(&only.id, date(2025, 3, 1), Argb(0xFFFF_C107))
        .await
        .unwrap();
    repo.save_day_color(&only.id, date(2025, 3, 2), Argb(0xFF4C_AF50))
        .await
        .unwrap();

    repo.delete_calendar(&only.id).await.unwrap();

    let data = repo.calendar_data().await;
    assert!(data.calendars.is_empty());
    assert_eq!(data.selected_calendar_id, None);
    assert!(data.calendar_days.is_empty());
}

#[tokio::test]
async fn reset_clears_everything() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);
    let cal = repo.selected_calendar().await.unwrap();
    repo.save_day_color(&cal.id, date(2025, 8, 6), Argb(0xFF11_2233))
        .await
        .unwrap();
    repo.save_settings(AppSettings {
        is_dark_mode: true,
        ..AppSettings::default()
    })
    .await
    .unwrap();

    repo.reset_all_data().await.unwrap();

    assert_eq!(repo.settings().await, AppSettings::default());
    assert!(repo.calendars().await.is_empty());
    assert!(repo.colored_days_current().await.is_empty());
}

#[tokio::test]
async fn corrupt_document_self_heals_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    // empty palette so migration does not repopulate the healed document
    seed(
        &dir,
        KEY_SETTINGS,
        codec::encode_settings(&no_palette_settings()),
    );
    seed(&dir, KEY_CALENDAR_DATA, "{not json".to_string());

    let repo = open_repo(&dir);
    assert!(repo.calendar_data().await.calendars.is_empty());
    // the corrupt key was dropped from the store, not just masked
    assert!(!stored_keys(&dir).contains(&KEY_CALENDAR_DATA.to_string()));
    // a second read is still empty, not an error
    assert!(repo.calendars().await.is_empty());
}

#[tokio::test]
async fn corrupt_settings_self_heal_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    seed(&dir, KEY_SETTINGS, "42".to_string());

    let repo = open_repo(&dir);
    assert_eq!(repo.settings().await, AppSettings::default());
}

#[tokio::test]
async fn current_scope_uses_legacy_store_until_a_calendar_is_selected() {
    let dir = tempfile::tempdir().unwrap();
    seed(
        &dir,
        KEY_SETTINGS,
        codec::encode_settings(&no_palette_settings()),
    );
    let repo = open_repo(&dir);
    assert!(repo.calendars().await.is_empty());

    // no selection: writes land in the legacy flat store
    repo.save_day_color_current(date(2024, 12, 25), Argb(0xFFAA_BBCC))
        .await
        .unwrap();
    assert_eq!(
        repo.day_color_current(date(2024, 12, 25)).await,
        Some(Argb(0xFFAA_BBCC))
    );

    // selecting a calendar reroutes the current scope; careful: saving a
    // calendar while the legacy store holds days does not migrate them
    let cal = Calendar::new("New", default_colors());
    let cal_id = cal.id.clone();
    repo.save_calendar(cal).await.unwrap();
    repo.set_selected_calendar(&cal_id).await.unwrap();

    assert!(repo.colored_days_current().await.is_empty());
    repo.save_day_color_current(date(2025, 1, 1), Argb(0xFF01_0101))
        .await
        .unwrap();
    assert_eq!(repo.colored_days(&cal_id).await.len(), 1);

    // deleting the calendar drops back to the legacy tier, where the old
    // entry is still visible
    repo.delete_calendar(&cal_id).await.unwrap();
    assert_eq!(
        repo.day_color_current(date(2024, 12, 25)).await,
        Some(Argb(0xFFAA_BBCC))
    );
}

#[tokio::test]
async fn blank_calendar_name_is_rejected_before_persisting() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);
    let before = repo.calendars().await.len();

    let result = repo
        .save_calendar(Calendar::new("   ", default_colors()))
        .await;
    assert!(matches!(result, Err(DaysError::Validation(_))));
    assert_eq!(repo.calendars().await.len(), before);
}

#[tokio::test]
async fn selecting_an_unknown_calendar_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);
    let result = repo.set_selected_calendar("no-such-id").await;
    assert!(matches!(result, Err(DaysError::Validation(_))));
}

#[tokio::test]
async fn upsert_replaces_in_place_preserving_order() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);
    let second = Calendar::new("B", default_colors());
    repo.save_calendar(second).await.unwrap();

    let mut first = repo.calendars().await[0].clone();
    first.name = "Renamed".to_string();
    repo.save_calendar(first).await.unwrap();

    let calendars = repo.calendars().await;
    assert_eq!(calendars.len(), 2);
    assert_eq!(calendars[0].name, "Renamed");
    assert_eq!(calendars[1].name, "B");
}

#[tokio::test]
async fn mutations_are_published_to_watchers() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);
    let cal = repo.selected_calendar().await.unwrap();

    let mut data_rx = repo.watch_calendar_data();
    let mut settings_rx = repo.watch_settings();

    repo.save_day_color(&cal.id, date(2025, 8, 6), Argb(0xFF4C_AF50))
        .await
        .unwrap();
    assert!(data_rx.has_changed().unwrap());
    assert_eq!(data_rx.borrow_and_update().days_for(&cal.id).len(), 1);

    repo.save_settings(AppSettings {
        has_seen_onboarding: true,
        ..AppSettings::default()
    })
    .await
    .unwrap();
    assert!(settings_rx.has_changed().unwrap());
    assert!(settings_rx.borrow_and_update().has_seen_onboarding);
}

#[tokio::test]
async fn clear_day_colors_empties_only_the_named_calendar() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);
    let first = repo.selected_calendar().await.unwrap();
    let second = Calendar::new("B", default_colors());
    let second_id = second.id.clone();
    repo.save_calendar(second).await.unwrap();

    repo.save_day_color(&first.id, date(2025, 5, 1), Argb(0xFF01_0101))
        .await
        .unwrap();
    repo.save_day_color(&second_id, date(2025, 5, 1), Argb(0xFF02_0202))
        .await
        .unwrap();

    repo.clear_day_colors(&first.id).await.unwrap();
    assert!(repo.colored_days(&first.id).await.is_empty());
    assert_eq!(repo.colored_days(&second_id).await.len(), 1);
}

#[tokio::test]
async fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let cal_id;
    {
        let repo = open_repo(&dir);
        let cal = repo.selected_calendar().await.unwrap();
        cal_id = cal.id.clone();
        repo.save_day_color(&cal_id, date(2025, 8, 6), Argb(0x8042_4242))
            .await
            .unwrap();
    }
    let repo = open_repo(&dir);
    assert_eq!(
        repo.day_color(&cal_id, date(2025, 8, 6)).await,
        Some(Argb(0x8042_4242))
    );
}
