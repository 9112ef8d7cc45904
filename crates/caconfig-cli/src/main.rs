//! Context-aware configuration CLI
//!
//! Resolves configurations of a content tree loaded from a file.

mod cli;
mod commands;
mod context;
mod error;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use context::CliContext;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.tree.as_deref(), cli.settings.as_deref()),
        None => {
            println!(
                "{} Context-aware configuration CLI",
                "caconfig".green().bold()
            );
            println!();
            println!("Run {} for available commands.", "caconfig --help".cyan());
            Ok(())
        }
    }
}

/// Log to stderr so JSON output on stdout stays clean.
fn init_tracing(verbose: bool) -> Result<()> {
    let builder = FmtSubscriber::builder().with_writer(std::io::stderr);
    let result = if verbose {
        let subscriber = builder
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = builder.with_env_filter(filter).finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    result.map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
    if verbose {
        tracing::debug!("Verbose mode enabled");
    }
    Ok(())
}

fn execute_command(
    cmd: Commands,
    tree: Option<&Path>,
    settings: Option<&Path>,
) -> Result<()> {
    let load = |run_modes: &[String]| CliContext::load(tree, settings, run_modes);
    match cmd {
        Commands::ContextPaths { resource, json } => {
            commands::run_context_paths(&load(&[])?, &resource, json)
        }
        Commands::Resolve {
            resource,
            name,
            collection,
            bucket,
            run_modes,
        } => commands::run_resolve(
            &load(&run_modes)?,
            &resource,
            &name,
            collection,
            bucket.as_deref(),
        ),
        Commands::Names { resource, json } => {
            commands::run_names(&load(&[])?, resource.as_deref(), json)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "caconfig", &mut std::io::stdout());
            Ok(())
        }
    }
}
