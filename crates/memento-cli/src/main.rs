//! Memento CLI - maintain and exercise a Memento personal site
//!
//! Encodes credentials, validates catalogs and walks the login/navigation
//! protocol against a local or deployed copy of the site.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, NotesCommands, PhotosCommands};
use crate::commands::check::run_check;
use crate::commands::common::SiteContext;
use crate::commands::completions::run_completions;
use crate::commands::encode::run_encode_user;
use crate::commands::notes::{run_notes_list, run_notes_show};
use crate::commands::photos::run_photos_list;
use crate::commands::status::run_status;
use crate::commands::walk::run_walk;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let directive: Directive = "memento=info"
        .parse()
        .map_err(|error| CliError::Config(format!("invalid log directive: {error}")))?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::EncodeUser { username, password } => run_encode_user(username, password)?,
        Commands::Completions { shell, output } => run_completions(*shell, output.as_deref())?,
        Commands::Status { state } => run_status(state.as_deref())?,
        Commands::Check => run_check(&SiteContext::from_cli(&cli)?).await?,
        Commands::Notes { command } => {
            let context = SiteContext::from_cli(&cli)?;
            match command {
                NotesCommands::List { json } => run_notes_list(&context, *json).await?,
                NotesCommands::Show { file } => run_notes_show(&context, file).await?,
            }
        }
        Commands::Photos { command } => {
            let context = SiteContext::from_cli(&cli)?;
            match command {
                PhotosCommands::List { category, json } => {
                    run_photos_list(&context, category.as_deref(), *json).await?;
                }
            }
        }
        Commands::Walk {
            username,
            password,
            state,
        } => run_walk(&SiteContext::from_cli(&cli)?, username, password, state.as_deref()).await?,
    }

    Ok(())
}
