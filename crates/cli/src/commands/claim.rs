// Path: crates/cli/src/commands/claim.rs

use crate::util;
use anyhow::{Context, Result};
use clap::Parser;
use koa_client::game::DEFAULT_WAIT_ROUNDS;
use koa_client::{ClaimOptions, ClaimOutcome, KingOfAlgo};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
pub struct ClaimArgs {
    /// Free text recorded in the claim's note.
    #[clap(long, default_value = "")]
    pub message: String,

    /// Simulate the group and save the request before submitting.
    #[clap(long)]
    pub debug: bool,

    #[clap(long, default_value_t = DEFAULT_WAIT_ROUNDS)]
    pub wait_rounds: u64,

    /// Give up waiting for confirmation after this many seconds.
    #[clap(long)]
    pub deadline_secs: Option<u64>,

    /// Application id. Defaults to the configured `app_id`.
    #[clap(long)]
    pub app_id: Option<u64>,

    /// Overrides the configured dry-run directory.
    #[clap(long)]
    pub dryrun_dir: Option<PathBuf>,

    #[clap(long, value_enum, default_value = "primary")]
    pub account: util::Signer,

    /// Print the outcome as JSON.
    #[clap(long)]
    pub json: bool,
}

impl ClaimArgs {
    fn options(&self, default_dir: &Path) -> ClaimOptions {
        ClaimOptions {
            debug: self.debug,
            wait_rounds: self.wait_rounds,
            dryrun_dir: self
                .dryrun_dir
                .clone()
                .unwrap_or_else(|| default_dir.to_path_buf()),
            deadline: self.deadline_secs.map(Duration::from_secs),
            split_override: None,
        }
    }
}

fn summary(outcome: &ClaimOutcome) -> serde_json::Value {
    json!({
        "tx_id": outcome.confirmation.tx_id,
        "group_id": outcome.group_id.to_string(),
        "confirmed_round": outcome.confirmation.confirmed_round,
        "paid": outcome.pricing.pay_amount,
        "admin_fee": outcome.pricing.admin_fee_amount,
        "reward": outcome.pricing.reward_amount,
        "comp": outcome.pricing.comp_amount,
        "reign_ended": outcome.pricing.reign_ended,
        "dry_run": outcome.dry_run.as_ref().map(|r| r.request_path.display().to_string()),
    })
}

pub async fn run(config_path: &Path, args: ClaimArgs) -> Result<()> {
    let config = util::load_config(config_path)?;
    let creator = util::account(&config, util::Signer::Primary)?;
    let challenger = util::account(&config, args.account)?;
    let client = util::algod(&config)?;
    let app_id = match args.app_id {
        Some(id) => id,
        None => config.require_app_id()?,
    };

    let options = args.options(&config.dryrun_dir);
    let game = KingOfAlgo::new(&client, app_id);
    let outcome = game
        .become_king(&creator.address(), &challenger, &args.message, &options)
        .await
        .with_context(|| format!("claiming the throne of app {}", app_id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary(&outcome))?);
        return Ok(());
    }
    if let Some(report) = &outcome.dry_run {
        println!("Dry run saved to {}", report.request_path.display());
        print!("{}", report);
    }
    println!("{} is now king of app {}", challenger.address(), app_id);
    println!("  Paid:      {}", util::algos(outcome.pricing.pay_amount));
    println!("  Group:     {}", outcome.group_id);
    println!("  Tx:        {}", outcome.confirmation.tx_id);
    println!("  Round:     {}", outcome.confirmation.confirmed_round);
    Ok(())
}
