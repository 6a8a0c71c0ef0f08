// Path: crates/cli/src/commands/state.rs

use crate::util;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use koa_client::KingOfAlgo;
use koa_tx::Pricing;
use std::path::Path;

#[derive(Parser, Debug)]
pub struct StateArgs {
    /// Application id. Defaults to the configured `app_id`.
    #[clap(long)]
    pub app_id: Option<u64>,
}

pub async fn run(config_path: &Path, args: StateArgs) -> Result<()> {
    let config = util::load_config(config_path)?;
    let creator = util::account(&config, util::Signer::Primary)?;
    let client = util::algod(&config)?;
    let app_id = match args.app_id {
        Some(id) => id,
        None => config.require_app_id()?,
    };

    let game = KingOfAlgo::new(&client, app_id);
    let state = game
        .read_state(&creator.address())
        .await
        .context("reading contract state")?;
    let now = Utc::now();
    let pricing = Pricing::compute(&state, now)?;

    println!("King of Algo {} ({})", app_id, game.app_address());
    match state.king {
        Some(king) => println!("  King:          {}", king),
        None => println!("  King:          <vacant>"),
    }
    println!("  Admin:         {}", state.admin);
    println!("  End Of Reign:  {}", state.end_of_reign.to_rfc3339());
    println!("  Reign Ended:   {}", pricing.reign_ended);
    println!("  King Price:    {}", util::algos(state.king_price));
    println!("  Init Price:    {}", util::algos(state.init_price));
    println!("  Price Now:     {}", util::algos(pricing.pay_amount));
    println!("    Admin Fee:   {}", util::algos(pricing.admin_fee_amount));
    println!("    Reward:      {}", util::algos(pricing.reward_amount));
    println!("    Contract:    {}", util::algos(pricing.comp_amount));
    Ok(())
}
