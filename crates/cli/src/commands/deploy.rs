// Path: crates/cli/src/commands/deploy.rs

use crate::util;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use koa_client::game::{APPROVAL_TEAL, CLEAR_TEAL, DEFAULT_WAIT_ROUNDS};
use koa_client::{deploy, save_app_id};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
pub struct DeployArgs {
    /// Protection window for each king, in seconds. Defaults to the configured value.
    #[clap(long)]
    pub reign_period: Option<u64>,

    /// Approval program source. Defaults to the bundled program.
    #[clap(long)]
    pub approval: Option<PathBuf>,

    /// Clear-state program source. Defaults to the bundled program.
    #[clap(long)]
    pub clear: Option<PathBuf>,

    /// Directory receiving the `new-app-<timestamp>` artifact.
    #[clap(long, default_value = ".")]
    pub out_dir: PathBuf,

    #[clap(long, default_value_t = DEFAULT_WAIT_ROUNDS)]
    pub wait_rounds: u64,
}

fn program(path: Option<&Path>, bundled: &str) -> Result<Vec<u8>> {
    match path {
        Some(p) => fs::read(p).with_context(|| format!("reading {}", p.display())),
        None => Ok(bundled.as_bytes().to_vec()),
    }
}

pub async fn run(config_path: &Path, args: DeployArgs) -> Result<()> {
    let config = util::load_config(config_path)?;
    let creator = util::account(&config, util::Signer::Primary)?;
    let client = util::algod(&config)?;

    let approval = program(args.approval.as_deref(), APPROVAL_TEAL)?;
    let clear = program(args.clear.as_deref(), CLEAR_TEAL)?;
    let reign_period = Duration::from_secs(args.reign_period.unwrap_or(config.reign_period_secs));

    log::info!("deploying from {} with a {}s reign", creator.address(), reign_period.as_secs());
    let deployment = deploy(
        &client,
        &creator,
        &approval,
        &clear,
        reign_period,
        args.wait_rounds,
    )
    .await
    .context("deploying contract")?;

    let artifact = save_app_id(&args.out_dir, deployment.app_id, Utc::now())?;
    println!("Deployed King of Algo:");
    println!("  App ID:      {}", deployment.app_id);
    println!("  App Address: {}", deployment.app_address);
    println!("  Create Tx:   {}", deployment.create_tx_id);
    println!("  Fund Tx:     {}", deployment.fund_tx_id);
    println!("  Saved To:    {}", artifact.display());
    Ok(())
}
