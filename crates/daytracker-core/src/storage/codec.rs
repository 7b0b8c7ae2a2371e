//! Bidirectional mapping between the entity graph and its persisted JSON form.
//!
//! Encoding is pure and deterministic: the same input always yields
//! byte-identical output. Decoding is forward-compatible: unknown fields are
//! ignored, missing optional fields take their documented defaults, and only
//! malformed JSON or an unparseable date string is an error.
//!
//! Field names follow the persisted contract (camelCase, `dateString`,
//! `{"argb": <i64>}`), which is why these stored mirror types exist separately
//! from the domain types in [`crate::model`].

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::model::{AppSettings, Argb, Calendar, CalendarData, ColorMeaning, Day};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize, Deserialize)]
struct StoredColor {
    argb: i64,
}

impl StoredColor {
    fn from_color(color: Argb) -> Self {
        Self {
            argb: color.to_storage(),
        }
    }

    fn to_color(&self) -> Argb {
        Argb::from_storage(self.argb)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredColorMeaning {
    color: StoredColor,
    meaning: String,
}

impl StoredColorMeaning {
    fn from_meaning(meaning: &ColorMeaning) -> Self {
        Self {
            color: StoredColor::from_color(meaning.color),
            meaning: meaning.meaning.clone(),
        }
    }

    fn to_meaning(&self) -> ColorMeaning {
        ColorMeaning::new(self.color.to_color(), self.meaning.clone())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCalendar {
    id: String,
    name: String,
    color_scheme: Vec<StoredColorMeaning>,
    is_selected: bool,
    created_at: i64,
}

impl StoredCalendar {
    fn from_calendar(calendar: &Calendar) -> Self {
        Self {
            id: calendar.id.clone(),
            name: calendar.name.clone(),
            color_scheme: calendar
                .color_scheme
                .iter()
                .map(StoredColorMeaning::from_meaning)
                .collect(),
            is_selected: calendar.is_selected,
            created_at: calendar.created_at,
        }
    }

    fn to_calendar(&self) -> Calendar {
        Calendar {
            id: self.id.clone(),
            name: self.name.clone(),
            color_scheme: self.color_scheme.iter().map(|m| m.to_meaning()).collect(),
            is_selected: self.is_selected,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAppSettings {
    selected_color: StoredColor,
    is_dark_mode: bool,
    follow_system_theme: bool,
    available_colors: Vec<StoredColorMeaning>,
    #[serde(default)]
    has_seen_onboarding: bool,
}

impl StoredAppSettings {
    fn from_settings(settings: &AppSettings) -> Self {
        Self {
            selected_color: StoredColor::from_color(settings.selected_color),
            is_dark_mode: settings.is_dark_mode,
            follow_system_theme: settings.follow_system_theme,
            available_colors: settings
                .available_colors
                .iter()
                .map(StoredColorMeaning::from_meaning)
                .collect(),
            has_seen_onboarding: settings.has_seen_onboarding,
        }
    }

    fn to_settings(&self) -> AppSettings {
        AppSettings {
            selected_color: self.selected_color.to_color(),
            is_dark_mode: self.is_dark_mode,
            follow_system_theme: self.follow_system_theme,
            available_colors: self.available_colors.iter().map(|m| m.to_meaning()).collect(),
            has_seen_onboarding: self.has_seen_onboarding,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDayColor {
    date_string: String,
    color: StoredColor,
}

impl StoredDayColor {
    fn from_day(day: &Day) -> Self {
        Self {
            date_string: day.date.format(DATE_FORMAT).to_string(),
            color: StoredColor::from_color(day.color),
        }
    }

    fn to_day(&self) -> Result<Day, DecodeError> {
        let date = NaiveDate::parse_from_str(&self.date_string, DATE_FORMAT).map_err(|_| {
            DecodeError::BadDate {
                value: self.date_string.clone(),
            }
        })?;
        Ok(Day::new(date, self.color.to_color()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCalendarData {
    calendars: Vec<StoredCalendar>,
    #[serde(default)]
    selected_calendar_id: Option<String>,
    #[serde(default)]
    calendar_days: BTreeMap<String, Vec<StoredDayColor>>,
    /// Embedded copy of the global settings, written for external consumers
    /// of the blob; ignored on decode (the `app_settings` key is
    /// authoritative).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    global_settings: Option<StoredAppSettings>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredBackup {
    settings: StoredAppSettings,
    colored_days: Vec<StoredDayColor>,
}

/// Stored models contain only string-keyed maps and plain values, so
/// serialization cannot fail; encoding is total.
fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).expect("stored model serialization is infallible")
}

pub fn encode_settings(settings: &AppSettings) -> String {
    to_json(&StoredAppSettings::from_settings(settings))
}

pub fn decode_settings(text: &str) -> Result<AppSettings, DecodeError> {
    let stored: StoredAppSettings = serde_json::from_str(text)?;
    Ok(stored.to_settings())
}

/// Encodes the document, optionally embedding a copy of the global settings.
pub fn encode_calendar_data(data: &CalendarData, settings: Option<&AppSettings>) -> String {
    let stored = StoredCalendarData {
        calendars: data.calendars.iter().map(StoredCalendar::from_calendar).collect(),
        selected_calendar_id: data.selected_calendar_id.clone(),
        calendar_days: data
            .calendar_days
            .iter()
            .map(|(id, days)| {
                (id.clone(), days.iter().map(StoredDayColor::from_day).collect())
            })
            .collect(),
        global_settings: settings.map(StoredAppSettings::from_settings),
    };
    to_json(&stored)
}

pub fn decode_calendar_data(text: &str) -> Result<CalendarData, DecodeError> {
    let stored: StoredCalendarData = serde_json::from_str(text)?;
    let mut calendar_days = HashMap::new();
    for (id, days) in &stored.calendar_days {
        let days = days.iter().map(|d| d.to_day()).collect::<Result<Vec<_>, _>>()?;
        calendar_days.insert(id.clone(), days);
    }
    Ok(CalendarData {
        calendars: stored.calendars.iter().map(|c| c.to_calendar()).collect(),
        selected_calendar_id: stored.selected_calendar_id,
        calendar_days,
    })
}

/// Encodes the legacy flat day list (`colored_days` key).
pub fn encode_legacy_days(days: &BTreeMap<NaiveDate, Argb>) -> String {
    let stored: Vec<StoredDayColor> = days
        .iter()
        .map(|(&date, &color)| StoredDayColor::from_day(&Day::new(date, color)))
        .collect();
    to_json(&stored)
}

pub fn decode_legacy_days(text: &str) -> Result<Vec<Day>, DecodeError> {
    let stored: Vec<StoredDayColor> = serde_json::from_str(text)?;
    stored.iter().map(|d| d.to_day()).collect()
}

/// Encodes the user-facing backup shape (`{settings, coloredDays}`).
pub fn encode_backup(settings: &AppSettings, days: &BTreeMap<NaiveDate, Argb>) -> String {
    let stored = StoredBackup {
        settings: StoredAppSettings::from_settings(settings),
        colored_days: days
            .iter()
            .map(|(&date, &color)| StoredDayColor::from_day(&Day::new(date, color)))
            .collect(),
    };
    to_json(&stored)
}

/// Decodes a backup. Duplicate dates collapse to the last entry.
pub fn decode_backup(text: &str) -> Result<(AppSettings, BTreeMap<NaiveDate, Argb>), DecodeError> {
    let stored: StoredBackup = serde_json::from_str(text)?;
    let mut days = BTreeMap::new();
    for stored_day in &stored.colored_days {
        let day = stored_day.to_day()?;
        days.insert(day.date, day.color);
    }
    Ok((stored.settings.to_settings(), days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_colors;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_document() -> CalendarData {
        let mut cal_a = Calendar::create_default("Mood", default_colors());
        cal_a.created_at = 1_722_470_400_000;
        let mut cal_b = Calendar::new("Workouts", vec![ColorMeaning::new(Argb(0xFF00_57B8), "Gym")]);
        cal_b.created_at = 1_722_556_800_000;

        let mut calendar_days = HashMap::new();
        calendar_days.insert(
            cal_a.id.clone(),
            vec![
                Day::new(date(2025, 8, 6), Argb(0xFF4C_AF50)),
                Day::new(date(2025, 8, 7), Argb(0xFFE5_3E3E)),
            ],
        );
        let selected = cal_a.id.clone();
        CalendarData {
            calendars: vec![cal_a, cal_b],
            selected_calendar_id: Some(selected),
            calendar_days,
        }
    }

    #[test]
    fn document_roundtrip_preserves_structure_and_order() {
        let doc = sample_document();
        let encoded = encode_calendar_data(&doc, None);
        let decoded = decode_calendar_data(&encoded).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn encoding_is_deterministic() {
        let doc = sample_document();
        let settings = AppSettings::default();
        assert_eq!(
            encode_calendar_data(&doc, Some(&settings)),
            encode_calendar_data(&doc, Some(&settings))
        );
    }

    #[test]
    fn embedded_settings_are_ignored_on_decode() {
        let doc = sample_document();
        let with = decode_calendar_data(&encode_calendar_data(&doc, Some(&AppSettings::default())));
        let without = decode_calendar_data(&encode_calendar_data(&doc, None));
        assert_eq!(with.unwrap(), without.unwrap());
    }

    #[test]
    fn settings_roundtrip() {
        let mut settings = AppSettings::default();
        settings.is_dark_mode = true;
        settings.has_seen_onboarding = true;
        settings.selected_color = Argb(0x8000_00FF);
        let decoded = decode_settings(&encode_settings(&settings)).unwrap();
        assert_eq!(decoded, settings);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let text = r#"{
            "calendars": [],
            "selectedCalendarId": null,
            "futureField": {"nested": [1, 2, 3]}
        }"#;
        let decoded = decode_calendar_data(text).unwrap();
        assert!(decoded.calendars.is_empty());
    }

    #[test]
    fn missing_optionals_take_defaults() {
        let decoded = decode_calendar_data(r#"{"calendars": []}"#).unwrap();
        assert_eq!(decoded.selected_calendar_id, None);
        assert!(decoded.calendar_days.is_empty());

        let settings = decode_settings(
            r#"{
                "selectedColor": {"argb": 4294917950},
                "isDarkMode": false,
                "followSystemTheme": true,
                "availableColors": []
            }"#,
        )
        .unwrap();
        assert!(!settings.has_seen_onboarding);
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(
            decode_calendar_data("{truncated"),
            Err(DecodeError::Json(_))
        ));
        assert!(decode_legacy_days("[{]").is_err());
    }

    #[test]
    fn bad_date_string_is_a_decode_error() {
        let text = r#"[{"dateString": "06/08/2025", "color": {"argb": 0}}]"#;
        assert!(matches!(
            decode_legacy_days(text),
            Err(DecodeError::BadDate { .. })
        ));
    }

    #[test]
    fn legacy_days_roundtrip() {
        let mut days = BTreeMap::new();
        days.insert(date(2025, 8, 6), Argb(0xFF4C_AF50));
        days.insert(date(2024, 12, 31), Argb(0x01FF_FFFF));
        let decoded = decode_legacy_days(&encode_legacy_days(&days)).unwrap();
        assert_eq!(decoded.len(), 2);
        // BTreeMap input encodes in date order
        assert_eq!(decoded[0].date, date(2024, 12, 31));
        assert_eq!(decoded[1].color, Argb(0xFF4C_AF50));
    }

    #[test]
    fn backup_roundtrip() {
        let settings = AppSettings::default();
        let mut days = BTreeMap::new();
        days.insert(date(2025, 1, 1), Argb(0xFFFF_C107));
        let (decoded_settings, decoded_days) =
            decode_backup(&encode_backup(&settings, &days)).unwrap();
        assert_eq!(decoded_settings, settings);
        assert_eq!(decoded_days, days);
    }

    proptest! {
        #[test]
        fn color_bits_roundtrip_exactly(bits in any::<u32>()) {
            let encoded = StoredColor::from_color(Argb(bits));
            prop_assert_eq!(encoded.to_color(), Argb(bits));
            // and through full JSON
            let text = to_json(&encoded);
            let back: StoredColor = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(back.to_color(), Argb(bits));
        }

        #[test]
        fn arbitrary_day_roundtrips(
            bits in any::<u32>(),
            days_off in 0i64..100_000,
        ) {
            let base = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
            let d = base + chrono::Days::new(days_off as u64);
            let stored = StoredDayColor::from_day(&Day::new(d, Argb(bits)));
            let back = stored.to_day().unwrap();
            prop_assert_eq!(back.date, d);
            prop_assert_eq!(back.color, Argb(bits));
        }
    }
}
