//! Calendar management commands for CLI.

use clap::Subcommand;
use daytracker_core::{default_colors, Calendar};

use super::{open_remote, CliResult};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// List calendars
    List,
    /// Create a new calendar
    Create {
        /// Calendar name
        name: String,
        /// Select it immediately
        #[arg(long)]
        select: bool,
    },
    /// Delete a calendar
    Delete {
        /// Calendar ID
        id: String,
    },
    /// Select the calendar day commands operate on
    Select {
        /// Calendar ID
        id: String,
    },
    /// Show the selected calendar
    Selected,
}

pub async fn run(action: CalendarAction) -> CliResult {
    let repo = open_remote()?;

    match action {
        CalendarAction::List => {
            let calendars = repo.calendars().await;
            if calendars.is_empty() {
                println!("No calendars.");
            }
            for cal in calendars {
                let marker = if cal.is_selected { "*" } else { " " };
                println!("{marker} {}  {}", cal.id, cal.name);
            }
        }
        CalendarAction::Create { name, select } => {
            let calendar = Calendar::new(&name, default_colors());
            let id = calendar.id.clone();
            repo.save_calendar(calendar).await?;
            if select {
                // remote creation does not touch the local document, so the
                // id may not be selectable until the calendar exists locally
                if let Err(e) = repo.set_selected_calendar(&id).await {
                    log::warn!("created but not selected: {e}");
                }
            }
            println!("Calendar created: {id}");
        }
        CalendarAction::Delete { id } => {
            repo.delete_calendar(&id).await?;
            println!("Calendar deleted: {id}");
        }
        CalendarAction::Select { id } => {
            repo.set_selected_calendar(&id).await?;
            println!("Selected calendar: {id}");
        }
        CalendarAction::Selected => match repo.selected_calendar().await {
            Some(cal) => println!("{}  {}", cal.id, cal.name),
            None => println!("No calendar selected."),
        },
    }

    Ok(())
}
