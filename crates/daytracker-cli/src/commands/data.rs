//! Backup, restore, and reset commands for CLI.

use std::path::PathBuf;

use clap::Subcommand;

use super::{open_local, CliResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Export settings and the current day scope as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import a previously exported backup
    Import {
        /// Backup file
        file: PathBuf,
    },
    /// Delete all local data
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(action: DataAction) -> CliResult {
    let repo = open_local()?;

    match action {
        DataAction::Export { output } => {
            let backup = repo.export_data().await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &backup)?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{backup}"),
            }
        }
        DataAction::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            if repo.import_data(&text).await {
                println!("Import complete.");
            } else {
                return Err("import rejected: file is not a valid backup".into());
            }
        }
        DataAction::Reset { yes } => {
            if !yes {
                return Err("refusing to reset without --yes".into());
            }
            repo.reset_all_data().await?;
            println!("All data reset.");
        }
    }

    Ok(())
}
