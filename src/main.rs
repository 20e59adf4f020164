mod api;
mod client;
mod commands;
mod config;
mod lookup;
mod models;
#[cfg(test)]
mod testing;

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::client::{Credentials, PagerDutyClient};
use crate::commands::Outcome;
use crate::config::Config;
use crate::lookup::WindowQuery;

#[derive(Parser)]
#[command(name = "pd-maintenance")]
#[command(version, about = "Create, extend and end PagerDuty maintenance windows")]
struct Cli {
    /// Path to config file (defaults to ~/.config/pd-maintenance/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a maintenance window starting now
    Add {
        #[command(flatten)]
        target: Target,
        /// Duration in minutes
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        duration: u32,
    },
    /// End ongoing maintenance windows
    End {
        #[command(flatten)]
        target: Target,
    },
    /// Change the end of ongoing maintenance windows to now + duration
    Change {
        #[command(flatten)]
        target: Target,
        /// New duration in minutes, counted from now
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        duration: u32,
    },
    /// List ongoing maintenance windows
    List {
        #[command(flatten)]
        target: Target,
    },
}

/// Credentials and service shared by every subcommand
#[derive(Args)]
struct Target {
    /// PagerDuty API key
    #[arg(short = 'k', long = "key", env = "PAGERDUTY_API_KEY", hide_env_values = true)]
    key: String,
    /// Email of the acting PagerDuty user
    #[arg(short, long, env = "PAGERDUTY_EMAIL")]
    email: String,
    /// PagerDuty service id
    #[arg(short, long)]
    service: String,
}

impl Target {
    fn credentials(&self) -> Credentials {
        Credentials {
            api_key: self.key.clone(),
            email: self.email.clone(),
        }
    }
}

impl Commands {
    fn target(&self) -> &Target {
        match self {
            Commands::Add { target, .. }
            | Commands::End { target }
            | Commands::Change { target, .. }
            | Commands::List { target } => target,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Credentials may come from a .env file
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pd_maintenance=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config(cli.config.as_deref())?;
    let outcome = run(&cli.command, &config).await?;
    Ok(outcome.exit_code())
}

async fn run(command: &Commands, config: &Config) -> Result<Outcome> {
    let target = command.target();
    let client = PagerDutyClient::new(&target.credentials(), &config.api)?;
    let query = WindowQuery::from(&config.windows);
    let mut out = std::io::stdout();

    match command {
        Commands::Add { target, duration } => {
            commands::create(
                &client,
                &query.description,
                &target.service,
                *duration,
                Utc::now,
                &mut out,
            )
            .await
        }
        Commands::End { target } => commands::end(&client, &query, &target.service, &mut out).await,
        Commands::Change { target, duration } => {
            commands::change(
                &client,
                &query,
                &target.service,
                *duration,
                Utc::now,
                &mut out,
            )
            .await
        }
        Commands::List { target } => {
            commands::list(&client, &query, &target.service, &mut out).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "pd-maintenance",
            "add",
            "-k",
            "KEY",
            "-e",
            "me@example.com",
            "-d",
            "45",
            "-s",
            "PSVC1",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { target, duration } => {
                assert_eq!(target.key, "KEY");
                assert_eq!(target.email, "me@example.com");
                assert_eq!(target.service, "PSVC1");
                assert_eq!(duration, 45);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_end_with_long_flags() {
        let cli = Cli::try_parse_from([
            "pd-maintenance",
            "end",
            "--key",
            "KEY",
            "--email",
            "me@example.com",
            "--service",
            "PSVC1",
        ])
        .unwrap();
        assert_eq!(cli.command.target().service, "PSVC1");
        assert!(matches!(cli.command, Commands::End { .. }));
    }

    #[test]
    fn test_missing_service_is_usage_error() {
        let err = Cli::try_parse_from([
            "pd-maintenance",
            "end",
            "-k",
            "KEY",
            "-e",
            "me@example.com",
        ])
        .err()
        .unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_change_requires_duration() {
        let err = Cli::try_parse_from([
            "pd-maintenance",
            "change",
            "-k",
            "KEY",
            "-e",
            "me@example.com",
            "-s",
            "PSVC1",
        ])
        .err()
        .unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_duration_must_be_positive_integer() {
        for bad in ["abc", "0", "-5", "1.5"] {
            let result = Cli::try_parse_from([
                "pd-maintenance",
                "add",
                "-k",
                "KEY",
                "-e",
                "me@example.com",
                "-s",
                "PSVC1",
                "-d",
                bad,
            ]);
            assert!(result.is_err(), "duration {:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["pd-maintenance"]).is_err());
    }
}
