//! Account and session commands for CLI.

use clap::Subcommand;

use super::{open_remote, CliResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in and store the session
    Login {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// Create a new account (does not log in)
    Register {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// Drop the stored session
    Logout,
    /// Show session status
    Status,
}

pub async fn run(action: AuthAction) -> CliResult {
    let repo = open_remote()?;

    match action {
        AuthAction::Login { email, password } => {
            let user = repo.login(&email, &password).await?;
            println!("Logged in as {} ({})", user.email, user.id);
        }
        AuthAction::Register { email, password } => {
            let user = repo.register(&email, &password).await?;
            println!("Account created: {} ({})", user.email, user.id);
            println!("Run `daytracker-cli auth login` to sign in.");
        }
        AuthAction::Logout => {
            repo.logout();
            println!("Logged out.");
        }
        AuthAction::Status => match repo.session().current_user() {
            Some(user) => println!("Logged in as {} ({})", user.email, user.id),
            None => println!("Not logged in."),
        },
    }

    Ok(())
}
