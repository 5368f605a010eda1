//! swipedeck CLI - Record swipes and inspect the next deck from a terminal
//!
//! Every command acts for one actor on one local database.

mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::common::{resolve_db_path, Invocation};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::deck::run_deck;
use crate::commands::entity::run_entity;
use crate::commands::excluded::run_excluded;
use crate::commands::purge::run_purge;
use crate::commands::status::run_status;
use crate::commands::swipe::run_swipe;
use crate::commands::sync::run_sync;
use crate::commands::undo::run_undo;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "swipedeck=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let invocation = Invocation {
        db_path: resolve_db_path(cli.db_path),
        profile: cli.profile,
        actor: cli.actor,
    };

    match cli.command {
        Commands::Swipe {
            target,
            kind,
            action,
            category,
        } => {
            run_swipe(
                &invocation,
                &target,
                kind.into(),
                action.into(),
                category.as_deref(),
            )
            .await?;
        }
        Commands::Undo => run_undo(&invocation).await?,
        Commands::Excluded { kind, json } => run_excluded(&invocation, kind.into(), json).await?,
        Commands::Deck { kind, limit, json } => {
            run_deck(&invocation, kind.into(), limit, json).await?;
        }
        Commands::Status { kind, json } => run_status(&invocation, kind.into(), json).await?,
        Commands::Purge { kind } => run_purge(&invocation, kind.into()).await?,
        Commands::Entity { command } => run_entity(&invocation, command).await?,
        Commands::Config { command } => run_config(command, invocation.profile.as_deref())?,
        Commands::Sync => run_sync(&invocation).await?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
