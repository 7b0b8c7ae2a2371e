//! Backup export/import over the current day scope.

use chrono::NaiveDate;
use daytracker_core::storage::{codec, KEY_SETTINGS, PREFS_FILE};
use daytracker_core::{AppSettings, Argb, LocalRepository, PrefStore};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open_repo(dir: &tempfile::TempDir) -> LocalRepository {
    let store = PrefStore::open(dir.path().join(PREFS_FILE)).unwrap();
    LocalRepository::open(store)
}

#[tokio::test]
async fn export_then_import_restores_the_observable_state() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);

    repo.save_settings(AppSettings {
        is_dark_mode: true,
        has_seen_onboarding: true,
        ..AppSettings::default()
    })
    .await
    .unwrap();
    repo.save_day_color_current(date(2025, 8, 1), Argb(0xFFE5_3E3E))
        .await
        .unwrap();
    repo.save_day_color_current(date(2025, 8, 2), Argb(0xFF4C_AF50))
        .await
        .unwrap();

    let backup = repo.export_data().await.unwrap();

    // mutate after the snapshot
    repo.save_day_color_current(date(2025, 8, 1), Argb(0xFF00_0000))
        .await
        .unwrap();
    repo.save_day_color_current(date(2025, 8, 3), Argb(0xFF11_1111))
        .await
        .unwrap();
    repo.save_settings(AppSettings::default()).await.unwrap();

    assert!(repo.import_data(&backup).await);

    let settings = repo.settings().await;
    assert!(settings.is_dark_mode);
    assert!(settings.has_seen_onboarding);

    let days = repo.colored_days_current().await;
    assert_eq!(days.len(), 2);
    assert_eq!(days[&date(2025, 8, 1)], Argb(0xFFE5_3E3E));
    assert_eq!(days[&date(2025, 8, 2)], Argb(0xFF4C_AF50));
}

#[tokio::test]
async fn malformed_import_is_rejected_and_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir);
    repo.save_day_color_current(date(2025, 8, 1), Argb(0xFFE5_3E3E))
        .await
        .unwrap();
    repo.save_settings(AppSettings {
        is_dark_mode: true,
        ..AppSettings::default()
    })
    .await
    .unwrap();

    assert!(!repo.import_data("{\"settings\": 7}").await);
    assert!(!repo.import_data("not json at all").await);

    assert!(repo.settings().await.is_dark_mode);
    assert_eq!(
        repo.day_color_current(date(2025, 8, 1)).await,
        Some(Argb(0xFFE5_3E3E))
    );
}

#[tokio::test]
async fn import_targets_the_legacy_tier_when_no_calendar_is_selected() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = PrefStore::open(dir.path().join(PREFS_FILE)).unwrap();
        let settings = AppSettings {
            available_colors: Vec::new(),
            ..AppSettings::default()
        };
        store
            .put(KEY_SETTINGS, codec::encode_settings(&settings))
            .unwrap();
    }
    let repo = open_repo(&dir);
    assert!(repo.calendars().await.is_empty());

    let mut days = std::collections::BTreeMap::new();
    days.insert(date(2025, 2, 14), Argb(0xFFFF_C107));
    let backup = codec::encode_backup(&AppSettings::default(), &days);

    assert!(repo.import_data(&backup).await);
    assert_eq!(
        repo.day_color_current(date(2025, 2, 14)).await,
        Some(Argb(0xFFFF_C107))
    );
}
