//! Dockyard CLI - builds the IoT.js runtime and its native dependencies

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dockyard::util::shell::Verbosity;
use dockyard::util::{GlobalContext, Shell};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color);

    let filter = match shell.verbosity() {
        Verbosity::Quiet => EnvFilter::new("dockyard=warn"),
        Verbosity::Normal => EnvFilter::new("dockyard=info"),
        Verbosity::Verbose => EnvFilter::new("dockyard=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut gctx = GlobalContext::new()?;
    if let Some(root) = cli.root {
        gctx.set_root(root);
    }

    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &gctx, &shell),
        Commands::Config(args) => commands::config::execute(args, &gctx),
        Commands::Cache(args) => commands::cache::execute(args, &gctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
