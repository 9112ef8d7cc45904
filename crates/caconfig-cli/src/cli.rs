//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Context-aware configuration - Resolve configurations for content resources
#[derive(Parser, Debug)]
#[command(name = "caconfig")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Content tree document (TOML, JSON or YAML)
    #[arg(long, global = true, env = "CACONFIG_TREE")]
    pub tree: Option<PathBuf>,

    /// Settings file (TOML, JSON or YAML)
    #[arg(long, global = true, env = "CACONFIG_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List the context resources of a content resource, nearest first
    ContextPaths {
        /// Path of the content resource
        resource: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Resolve a configuration and print it as JSON
    ///
    /// Examples:
    ///   caconfig --tree content.json resolve /content/site1/page my.app.Config
    ///   caconfig --tree content.json resolve /content/site1/page my.app.List --collection
    ///   caconfig --tree content.json resolve /content/site1/page my.app.Config --run-mode dev
    Resolve {
        /// Path of the content resource
        resource: String,

        /// Configuration name
        name: String,

        /// Resolve a configuration collection
        #[arg(short, long)]
        collection: bool,

        /// Bucket to look up raw configuration resources in
        ///
        /// Without a bucket the effective configuration is printed, with
        /// inheritance, overrides and defaults applied.
        #[arg(short, long)]
        bucket: Option<String>,

        /// Active run mode; may be given more than once, most specific first
        #[arg(short, long = "run-mode")]
        run_modes: Vec<String>,
    },

    /// List configuration names known to the metadata
    Names {
        /// Show which configurations exist for this content resource
        #[arg(short, long)]
        resource: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   caconfig completions bash > ~/.local/share/bash-completion/completions/caconfig
    ///   caconfig completions zsh > ~/.zfunc/_caconfig
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
