//! `adala`: the practice API from the terminal.

mod commands;
mod prompt;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;

use adala_client::config::{API_URL_ENV, TIMEOUT_ENV};
use adala_client::{AdalaClient, ClientConfig, Collaborators, Confirm};

use crate::commands::{DeleteArgs, LeaveCommand, ListArgs, LoginArgs};
use crate::prompt::{AssumeYes, StdinConfirm};

/// Adala legal practice client.
#[derive(Parser, Debug)]
#[command(name = "adala", version, about)]
struct Cli {
    /// API root, e.g. https://firm.example/api.
    #[arg(long, global = true, env = API_URL_ENV)]
    api_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, env = TIMEOUT_ENV)]
    timeout: Option<u64>,

    /// Answer yes to every confirmation prompt.
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with account number, email and password (plus 2FA code).
    Login(LoginArgs),
    /// Sign out and forget the remembered session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// List one page of records.
    List(ListArgs),
    /// Delete one record after confirmation.
    Delete(DeleteArgs),
    /// Decide a pending leave request.
    #[command(subcommand)]
    Leave(LeaveCommand),
}

impl Cli {
    fn config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::from_env().context("invalid client configuration")?;
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url)?;
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout_secs(secs)?;
        }
        Ok(config)
    }

    fn collaborators(&self) -> Collaborators {
        let confirm: Arc<dyn Confirm> = if self.yes {
            Arc::new(AssumeYes)
        } else {
            Arc::new(StdinConfirm)
        };
        Collaborators::logging(confirm)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    adala_observability::init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let adala = AdalaClient::new(&config).context("failed to build HTTP client")?;
    if let Err(err) = adala.restore_session().await {
        warn!(error = %format!("{err:#}"), "ignoring unreadable session file");
    }

    let collaborators = cli.collaborators();
    match &cli.command {
        Command::Login(args) => commands::login(&adala, collaborators, args).await,
        Command::Logout => commands::logout(&adala, collaborators).await,
        Command::Whoami => commands::whoami(&adala).await,
        Command::List(args) => commands::list(&adala, collaborators, args).await,
        Command::Delete(args) => commands::delete(&adala, collaborators, args).await,
        Command::Leave(command) => commands::leave(&adala, command).await,
    }
}
