use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use serde::{Deserialize, Serialize};

use crate::catalog::Platform;
use crate::config::SourceKind;

/// Cached, searchable view of the Universal-DB homebrew catalog
#[derive(Parser)]
#[command(name = "udb-api")]
#[command(version, propagate_version = true)]
#[command(about = "Cached, searchable view of the Universal-DB homebrew catalog")]
pub struct Cli {
    /// Output format for command results
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Show debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Write shell completions for `shell` to stdout
    pub fn print_completions(shell: Shell) {
        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
    }
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored, human-readable output
    #[default]
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API with a background refresh loop
    Serve(ServeArgs),

    /// Fetch the upstream feed once and write it to the shared cache
    Fetch,

    /// Fuzzy search the shared cache
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Look up an application by exact title in the shared cache
    Get(GetArgs),

    /// Manage the shared cache
    Cache(CacheArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the serve command
#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.bind)
    #[arg(short, long, env = "UDB_BIND")]
    pub bind: Option<String>,

    /// Seconds between refreshes (overrides refresh.interval_secs)
    #[arg(short, long, env = "UDB_INTERVAL")]
    pub interval: Option<u64>,

    /// Where refreshes read from (overrides refresh.source)
    #[arg(short, long, value_enum, env = "UDB_SOURCE")]
    pub source: Option<SourceKind>,

    /// Fail instead of serving if the first refresh fails
    #[arg(long)]
    pub strict_startup: bool,
}

/// Arguments for the search command
#[derive(Args)]
pub struct SearchArgs {
    /// Search text
    pub query: String,

    /// Restrict results to a system (3DS or DS)
    #[arg(long)]
    pub system: Option<Platform>,

    /// Maximum number of results (overrides search.limit)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the get command
#[derive(Args)]
pub struct GetArgs {
    /// Exact application title
    pub title: String,
}

/// Arguments for the cache command
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

/// Cache subcommands
#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show shared cache status
    Status,
    /// Remove the shared cache
    Clear,
}

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., refresh.interval_secs)
        key: String,
        /// Value to set
        value: String,
    },
    /// Show configuration file path
    Path,
}

/// Arguments for the completions command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
