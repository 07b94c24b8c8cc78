//! stree CLI - drives the structure tree engine from files on disk

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli_lib::render::RenderOptions;
use cli_lib::system_config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;

/// stree - Structure tree sync with stable node identities
#[derive(Parser)]
#[command(name = "stree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a structure snapshot and print the tree
    Show {
        /// Structure snapshot (JSON)
        #[arg(long)]
        input: PathBuf,
        /// Group catalog (JSON)
        #[arg(long)]
        groups: Option<PathBuf>,
        /// Expand every node with children
        #[arg(long)]
        expand_all: bool,
        /// Print node identities
        #[arg(long)]
        ids: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Watch a snapshot and refresh the tree on every change
    Watch {
        /// Structure snapshot (JSON)
        #[arg(long)]
        input: PathBuf,
        /// Refetch only the projects whose JSON changed
        #[arg(long)]
        scoped: bool,
        /// Print node identities
        #[arg(long)]
        ids: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Inspect and change group visibility
    #[command(subcommand)]
    Groups(GroupsCommands),
    /// View or edit configuration
    Config {
        /// List all configuration values (the default)
        #[arg(long)]
        list: bool,
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum GroupsCommands {
    /// List available groups and the current selection
    List {
        /// Group catalog (JSON)
        #[arg(long)]
        groups: PathBuf,
    },
    /// Select the visible groups of a project
    Set {
        /// Project name
        project: String,
        /// Group identifiers to show
        ids: Vec<String>,
        /// Show every group
        #[arg(long, conflicts_with = "ids")]
        all: bool,
        /// Group catalog (JSON)
        #[arg(long)]
        groups: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print a single value
    Get {
        /// Key such as sync.scoped_refresh
        key: String,
    },
    /// Change a single value
    Set {
        key: String,
        value: String,
    },
    /// Print the config file path
    Path {
        /// Create the file with defaults if missing
        #[arg(long)]
        create: bool,
    },
    /// Print an example configuration
    Example,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; RUST_LOG wins over the configured level
    let level = system_config::load()
        .map(|config| config.log.level)
        .unwrap_or_else(|_| "warn".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show { input, groups, expand_all, ids, no_color } => {
            let options = RenderOptions { ids, color: !no_color };
            cmd::show::run(&input, groups, expand_all, options).await
        }
        Commands::Watch { input, scoped, ids, no_color } => {
            let options = RenderOptions { ids, color: !no_color };
            cmd::watch::run(&input, scoped, options).await
        }
        Commands::Groups(groups_cmd) => match groups_cmd {
            GroupsCommands::List { groups } => cmd::groups::run_list(&groups).await,
            GroupsCommands::Set { project, ids, all, groups } => {
                cmd::groups::run_set(&project, &ids, all, &groups).await
            }
        },
        Commands::Config { action, .. } => match action {
            Some(ConfigCommands::Get { key }) => cmd::config::run_get(&key).await,
            Some(ConfigCommands::Set { key, value }) => cmd::config::run_set(&key, &value).await,
            Some(ConfigCommands::Path { create }) => cmd::config::run_path(create).await,
            Some(ConfigCommands::Example) => cmd::config::run_example().await,
            None => cmd::config::run_list().await,
        },
    }
}
