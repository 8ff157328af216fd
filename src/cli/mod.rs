pub mod commands;
pub mod prompt;
pub mod utils;

use std::future::Future;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::ConsoleError;
use crate::pages::{Console, PageScope};

#[derive(Parser)]
#[command(name = "kvc")]
#[command(about = "KVC console - administration client for the KVC backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Session management: login, logout, current user")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Show per-role counters for the collections you can see")]
    Dashboard,

    #[command(about = "List, show, create, update and delete records")]
    Data {
        #[command(subcommand)]
        cmd: commands::data::DataCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Exit status of a command stopped with Ctrl-C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// The command was stopped by the user before it finished.
#[derive(Debug, thiserror::Error)]
#[error("interrupted")]
pub struct Interrupted;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let console = Console::from_config(config::config())?;
    let scope = PageScope::new();

    let command = async {
        match cli.command {
            Commands::Auth { cmd } => commands::auth::handle(cmd, &console, &scope, output_format).await,
            Commands::Dashboard => commands::dashboard::handle(&console, &scope, output_format).await,
            Commands::Data { cmd } => commands::data::handle(cmd, &console, &scope, output_format).await,
        }
    };

    let signal = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // no signal handler available: never interrupt
            std::future::pending::<()>().await;
        }
    };

    let result = until_interrupted(&scope, command, signal).await;

    result.map_err(|e| match e.downcast_ref::<ConsoleError>() {
        Some(err) if err.requires_login() => {
            anyhow::anyhow!("{} Run `kvc auth login <username>` to start a new session.", err)
        }
        _ => e,
    })
}

/// Runs `command` unless `signal` fires first. On a signal the page scope is
/// closed, the command (prompts included) is dropped and [`Interrupted`] is
/// returned so the binary can exit.
pub async fn until_interrupted<C, S>(scope: &PageScope, command: C, signal: S) -> anyhow::Result<()>
where
    C: Future<Output = anyhow::Result<()>>,
    S: Future<Output = ()>,
{
    tokio::select! {
        result = command => result,
        _ = signal => {
            scope.close();
            tracing::debug!("interrupted; page closed");
            Err(Interrupted.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn signal_closes_scope_and_stops_a_blocked_prompt() {
        let scope = PageScope::new();
        let prompt = async {
            std::future::pending::<()>().await;
            Ok(())
        };

        let err = until_interrupted(&scope, prompt, async {}).await.unwrap_err();
        assert!(err.downcast_ref::<Interrupted>().is_some());
        assert!(scope.is_closed());
    }

    #[tokio::test]
    async fn finished_command_wins_over_a_later_signal() {
        let scope = PageScope::new();
        let signal = tokio::time::sleep(Duration::from_secs(5));

        until_interrupted(&scope, async { Ok(()) }, signal).await.unwrap();
        assert!(!scope.is_closed());
    }
}
