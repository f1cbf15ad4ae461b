//! # Mongodoki Main Entry Point
//!
//! File: cli/src/main.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! Entry point for the `mongodoki` CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Start a disposable MongoDB on 127.0.0.1:27017
//! mongodoki start
//!
//! # Start a specific tag on another port, restoring a dump, with debug logs
//! mongodoki -vv start -t 4.2 -p 27018 --dump ./dump/testDB
//!
//! # Tear it down
//! mongodoki stop
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

// Command handlers live in the binary; everything else comes from the
// mongodoki library crate.
mod commands;

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "mongodoki",
    about = "Disposable MongoDB containers for integration tests",
    long_about = "Spin up a throwaway MongoDB container bound to localhost, wait until it\n\
                  actually answers, optionally restore a dump into it, and tear it down\n\
                  again when the tests are done.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    Start(commands::start::StartArgs),
    Stop(commands::stop::StopArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Start(args) => commands::start::handle_start(args).await,
        Commands::Stop(args) => commands::stop::handle_stop(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
