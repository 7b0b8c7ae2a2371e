//! Day coloring commands for CLI.
//!
//! Without `--calendar` these operate on the current scope: the selected
//! calendar when one exists, otherwise the flat legacy store.

use clap::Subcommand;

use super::{open_local, parse_color, parse_date, CliResult};

#[derive(Subcommand)]
pub enum DayAction {
    /// Color a day
    Set {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Color as #AARRGGBB or #RRGGBB
        color: String,
        /// Calendar ID (default: current scope)
        #[arg(long)]
        calendar: Option<String>,
    },
    /// Remove a day's color
    Unset {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Calendar ID (default: current scope)
        #[arg(long)]
        calendar: Option<String>,
    },
    /// Show a day's color
    Get {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Calendar ID (default: current scope)
        #[arg(long)]
        calendar: Option<String>,
    },
    /// List all colored days
    List {
        /// Calendar ID (default: current scope)
        #[arg(long)]
        calendar: Option<String>,
    },
    /// Remove every colored day
    Clear {
        /// Calendar ID (default: current scope)
        #[arg(long)]
        calendar: Option<String>,
    },
}

pub async fn run(action: DayAction) -> CliResult {
    let repo = open_local()?;

    match action {
        DayAction::Set {
            date,
            color,
            calendar,
        } => {
            let date = parse_date(&date)?;
            let color = parse_color(&color)?;
            match calendar {
                Some(id) => repo.save_day_color(&id, date, color).await?,
                None => repo.save_day_color_current(date, color).await?,
            }
            println!("{date} -> {color}");
        }
        DayAction::Unset { date, calendar } => {
            let date = parse_date(&date)?;
            match calendar {
                Some(id) => repo.remove_day_color(&id, date).await?,
                None => repo.remove_day_color_current(date).await?,
            }
            println!("{date} cleared");
        }
        DayAction::Get { date, calendar } => {
            let date = parse_date(&date)?;
            let color = match calendar {
                Some(id) => repo.day_color(&id, date).await,
                None => repo.day_color_current(date).await,
            };
            match color {
                Some(color) => println!("{color}"),
                None => println!("(uncolored)"),
            }
        }
        DayAction::List { calendar } => {
            let days = match calendar {
                Some(id) => repo.colored_days(&id).await,
                None => repo.colored_days_current().await,
            };
            if days.is_empty() {
                println!("No colored days.");
            }
            for (date, color) in days {
                println!("{date}  {color}");
            }
        }
        DayAction::Clear { calendar } => {
            match calendar {
                Some(id) => repo.clear_day_colors(&id).await?,
                None => repo.clear_day_colors_current().await?,
            }
            println!("Cleared.");
        }
    }

    Ok(())
}
