use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::{Overrides, ProbeConfig};

#[derive(Parser)]
#[command(name = "ufo-probe", version, about = "UFO temperature probe — read or describe")]
struct Cli {
    /// Instrument name (default: ufo)
    #[arg(long, env = "UFO_NAME")]
    name: Option<String>,

    /// TIP host (default: pi-us74)
    #[arg(long, env = "TIP_ADDRESS")]
    address: Option<String>,

    /// TIP port (default: 9999)
    #[arg(long, env = "TIP_PORT")]
    port: Option<u16>,

    /// Socket timeout in milliseconds, 0 = none (default: 5000)
    #[arg(long, env = "TIP_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// JSON config file
    #[arg(long, env = "UFO_CONFIG")]
    config: Option<PathBuf>,

    /// Reject non-finite or negative kelvin readings
    #[arg(long)]
    validate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the current temperature once
    Read {
        /// Print samples as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the instrument descriptor (no connection)
    Describe,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let overrides = Overrides {
        name: cli.name,
        address: cli.address,
        port: cli.port,
        timeout_ms: cli.timeout_ms,
        validate: cli.validate,
    };

    let result = ProbeConfig::resolve(cli.config.as_deref(), overrides)
        .map_err(anyhow::Error::from)
        .and_then(|cfg| match cli.command {
            Commands::Read { json } => commands::read(&cfg, json),
            Commands::Describe => commands::describe(&cfg),
        });

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        process::exit(commands::exit_code_for(&e));
    }
}
