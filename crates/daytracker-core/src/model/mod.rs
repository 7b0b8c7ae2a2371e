//! Domain entities: colors, calendars, days, settings.
//!
//! These types carry no serde attributes on purpose -- the persisted textual
//! form lives entirely in [`crate::storage::codec`], which maps to and from
//! these types. Keeping the two apart lets the stored shape evolve without
//! touching the domain.

mod calendar;
mod color;
mod day;
mod settings;

pub use calendar::{Calendar, CalendarData};
pub use color::{Argb, ColorMeaning};
pub use day::Day;
pub use settings::{default_colors, AppSettings};
