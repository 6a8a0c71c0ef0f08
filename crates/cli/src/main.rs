// Path: crates/cli/src/main.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # King of Algo CLI
//!
//! Deploys the contract, inspects its state and claims the throne.

use anyhow::Result;
use clap::{Parser, Subcommand};
use koa_types::config::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

mod commands;
mod util;

use commands::*;

#[derive(Parser, Debug)]
#[clap(
    name = "koa",
    version,
    about = "Play King of Algo from the command line.",
    long_about = "Deploy the King of Algo contract, read its state, and claim the throne with a correctly split payment group."
)]
struct Cli {
    /// Path to the base configuration file.
    #[clap(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Emit structured JSON logs instead of plain text.
    #[clap(long, global = true)]
    json_logs: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile, create and fund a new contract.
    Deploy(deploy::DeployArgs),

    /// Print the contract's current state and price.
    State(state::StateArgs),

    /// Claim the throne for the configured account.
    Claim(claim::ClaimArgs),

    /// Print an account's balance.
    Balance(balance::BalanceArgs),

    /// Generate or inspect accounts.
    Keys(keys::KeysArgs),

    /// Write a starter configuration file.
    Config(config::ConfigCmdArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        koa_telemetry::init::init_tracing()?;
    } else {
        if std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", "info");
        }
        env_logger::init();
    }

    match cli.command {
        Commands::Deploy(args) => deploy::run(&cli.config, args).await,
        Commands::State(args) => state::run(&cli.config, args).await,
        Commands::Claim(args) => claim::run(&cli.config, args).await,
        Commands::Balance(args) => balance::run(&cli.config, args).await,
        Commands::Keys(args) => keys::run(args),
        Commands::Config(args) => config::run(args),
    }
}
