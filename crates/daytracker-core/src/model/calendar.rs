use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{ColorMeaning, Day};

/// A user-defined named collection of colored days with its own palette.
///
/// `id` is assigned at creation and immutable. `is_selected` is a
/// denormalized copy of the document-level selection pointer; the repository
/// keeps the two consistent on every selection change.
#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    pub id: String,
    pub name: String,
    pub color_scheme: Vec<ColorMeaning>,
    pub is_selected: bool,
    pub created_at: i64,
}

impl Calendar {
    pub fn new(name: impl Into<String>, color_scheme: Vec<ColorMeaning>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color_scheme,
            is_selected: false,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// A calendar born selected, used when synthesizing the migration target.
    pub fn create_default(name: impl Into<String>, color_scheme: Vec<ColorMeaning>) -> Self {
        Self {
            is_selected: true,
            ..Self::new(name, color_scheme)
        }
    }
}

/// The single persisted aggregate: calendars, their day lists, and the
/// selected-calendar pointer.
///
/// Invariants:
/// - `selected_calendar_id`, when set, references an element of `calendars`;
///   deleting the referent reassigns or clears it.
/// - every key of `calendar_days` corresponds to an existing calendar;
///   deleting a calendar removes its entry.
/// - dates are unique within each day list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarData {
    pub calendars: Vec<Calendar>,
    pub selected_calendar_id: Option<String>,
    pub calendar_days: HashMap<String, Vec<Day>>,
}

impl CalendarData {
    pub fn selected_calendar(&self) -> Option<&Calendar> {
        let id = self.selected_calendar_id.as_deref()?;
        self.calendars.iter().find(|c| c.id == id)
    }

    pub fn days_for(&self, calendar_id: &str) -> &[Day] {
        self.calendar_days
            .get(calendar_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn current_days(&self) -> &[Day] {
        match self.selected_calendar_id.as_deref() {
            Some(id) => self.days_for(id),
            None => &[],
        }
    }
}
