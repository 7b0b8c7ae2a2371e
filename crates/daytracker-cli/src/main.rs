use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "daytracker-cli", version, about = "Day Tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calendar management
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// Day coloring
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Global settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Backup, restore, and reset
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Account and session management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
}

#[tokio::main]
async fn main() {
    // the handle must outlive all commands; dropping it shuts the logger down
    let logger = flexi_logger::Logger::try_with_env_or_str("warn").and_then(|l| l.start());
    if let Err(e) = &logger {
        eprintln!("warning: logger not started: {e}");
    }

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Calendar { action } => commands::calendar::run(action).await,
        Commands::Day { action } => commands::day::run(action).await,
        Commands::Settings { action } => commands::settings::run(action).await,
        Commands::Data { action } => commands::data::run(action).await,
        Commands::Auth { action } => commands::auth::run(action).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
