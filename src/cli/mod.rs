//! CLI module for the Capstone Teams service
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `migrate`: apply or revert the PostgreSQL schema
//! - `token`: issue a JWT for an existing user

pub mod migrate;
pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};

/// Capstone Teams - project teams, invitations and notifications
#[derive(Parser)]
#[command(name = "capstone-teams")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Apply pending database migrations
    Migrate(migrate::MigrateArgs),

    /// Issue an access token for a user
    Token(token::TokenArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_command() {
        let cli = Cli::try_parse_from([
            "capstone-teams",
            "token",
            "--user",
            "6f1c2b0e-8d7a-4a51-9a43-0f3b7d1e2c11",
        ])
        .unwrap();

        match cli.command {
            Command::Token(args) => assert_eq!(args.user, "6f1c2b0e-8d7a-4a51-9a43-0f3b7d1e2c11"),
            _ => panic!("expected token command"),
        }
    }

    #[test]
    fn test_parse_migrate_revert() {
        let cli = Cli::try_parse_from(["capstone-teams", "migrate", "--revert"]).unwrap();

        match cli.command {
            Command::Migrate(args) => assert!(args.revert),
            _ => panic!("expected migrate command"),
        }
    }

    #[test]
    fn test_token_requires_user() {
        assert!(Cli::try_parse_from(["capstone-teams", "token"]).is_err());
    }
}
