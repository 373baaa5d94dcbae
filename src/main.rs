use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use watchtree::commands::{apply, check, tree};
use watchtree::validation::clap_identifier_validator;

#[derive(Parser)]
#[command(name = "watchtree")]
#[command(about = "Monitoring tree engine: validate, inspect and exercise tree files", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level or filter directive (overrides the tree file's [logging] table)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a tree file and report configuration errors
    Check {
        /// Path to the tree file (TOML, or YAML by extension)
        tree: PathBuf,
    },

    /// Print the node hierarchy with statuses
    Tree {
        /// Path to the tree file
        tree: PathBuf,

        /// Only show the subtree under this node
        #[arg(short, long, value_parser = clap_identifier_validator)]
        node: Option<String>,
    },

    /// Apply a JSON batch of monitor updates and print the resulting events
    Apply {
        /// Path to the tree file
        tree: PathBuf,

        /// JSON object mapping node identifiers to properties
        updates: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = cli.log_level.as_deref();

    match cli.command {
        Commands::Check { tree: path } => check::execute(&path, log_level),
        Commands::Tree { tree: path, node } => tree::execute(&path, node.as_deref(), log_level),
        Commands::Apply {
            tree: path,
            updates,
        } => apply::execute(&path, &updates, log_level),
    }
}
