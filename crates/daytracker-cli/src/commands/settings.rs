//! Global settings commands for CLI.

use clap::Subcommand;
use daytracker_core::ColorMeaning;

use super::{open_local, parse_color, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show,
    /// Update settings
    Set {
        /// Dark mode on/off
        #[arg(long)]
        dark_mode: Option<bool>,
        /// Follow the system theme on/off
        #[arg(long)]
        follow_system: Option<bool>,
        /// Brush color as #AARRGGBB or #RRGGBB
        #[arg(long)]
        selected_color: Option<String>,
        /// Mark onboarding as seen
        #[arg(long)]
        onboarding_seen: Option<bool>,
    },
    /// Replace the color palette
    Palette {
        /// Entries as COLOR=MEANING, e.g. "#FFE53E3E=Bad Day"
        entries: Vec<String>,
    },
}

pub async fn run(action: SettingsAction) -> CliResult {
    let repo = open_local()?;

    match action {
        SettingsAction::Show => {
            let settings = repo.settings().await;
            println!("selected color:  {}", settings.selected_color);
            println!("dark mode:       {}", settings.is_dark_mode);
            println!("follow system:   {}", settings.follow_system_theme);
            println!("onboarding seen: {}", settings.has_seen_onboarding);
            println!("palette:");
            for entry in &settings.available_colors {
                println!("  {}  {}", entry.color, entry.meaning);
            }
        }
        SettingsAction::Set {
            dark_mode,
            follow_system,
            selected_color,
            onboarding_seen,
        } => {
            let mut settings = repo.settings().await;
            if let Some(v) = dark_mode {
                settings.is_dark_mode = v;
            }
            if let Some(v) = follow_system {
                settings.follow_system_theme = v;
            }
            if let Some(v) = selected_color {
                settings.selected_color = parse_color(&v)?;
            }
            if let Some(v) = onboarding_seen {
                settings.has_seen_onboarding = v;
            }
            repo.save_settings(settings).await?;
            println!("Settings saved.");
        }
        SettingsAction::Palette { entries } => {
            if entries.is_empty() {
                return Err("at least one COLOR=MEANING entry is required".into());
            }
            let mut palette = Vec::with_capacity(entries.len());
            for entry in &entries {
                let (color, meaning) = entry
                    .split_once('=')
                    .ok_or_else(|| format!("invalid entry '{entry}', expected COLOR=MEANING"))?;
                palette.push(ColorMeaning::new(parse_color(color)?, meaning));
            }
            let mut settings = repo.settings().await;
            settings.available_colors = palette;
            repo.save_settings(settings).await?;
            println!("Palette saved.");
        }
    }

    Ok(())
}
