use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "missing-media")]
#[command(
    about = "Find media files missing from a Plex library, and library entries missing from disk",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub options: Options,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compare a library section against disk (default)
    Check,
    /// List the Movie, TV and Music sections available
    Sections,
    /// Print configuration values
    PrintConfig,
}

/// Values given here shadow the environment (`PLEX_*`), the config file and
/// built-in defaults.
#[derive(Debug, Default, Clone, Args)]
pub struct Options {
    /// Read from the Plex database directly instead of web API calls
    #[arg(long, global = true, num_args = 0..=1, default_missing_value = "true")]
    pub use_database: Option<bool>,

    /// Full path to the Plex database
    #[arg(short, long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Your Plex host. Defaults to http://localhost:32400
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Your Plex authentication token
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    /// The id of the library section to check
    #[arg(short, long, global = true)]
    pub section: Option<i64>,

    /// Match extras in addition to regular library items. Takes significantly
    /// more time over the web API
    #[arg(short = 'e', long, global = true, num_args = 0..=1, default_missing_value = "true")]
    pub find_extras: Option<bool>,

    /// Config file (yml, toml or json). Defaults to ./config.* when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Never ask; fail when a value is missing or the section is unusable
    #[arg(long, global = true)]
    pub no_prompt: bool,
}
