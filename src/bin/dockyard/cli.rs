//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use dockyard::util::shell::ColorChoice;

/// Dockyard - builds the IoT.js runtime and its native dependencies
#[derive(Parser)]
#[command(name = "dockyard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Project root (defaults to the nearest directory with a Dockyard.toml)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the dependencies and the runtime
    Build(BuildArgs),

    /// Print the resolved build configuration
    Config(ConfigArgs),

    /// List cached dependency artifacts
    Cache(CacheArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Build options, e.g. --build-type=release --no-run-tests
    #[arg(value_name = "OPTIONS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub options: Vec<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Build options to resolve
    #[arg(value_name = "OPTIONS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub options: Vec<String>,
}

#[derive(Args)]
pub struct CacheArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Build options selecting the build root
    #[arg(value_name = "OPTIONS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub options: Vec<String>,
}

impl CacheArgs {
    /// Move a `--json` captured among the trailing options into the flag.
    pub fn normalized(mut self) -> Self {
        let before = self.options.len();
        self.options.retain(|opt| opt != "--json");
        self.json |= self.options.len() != before;
        self
    }
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
