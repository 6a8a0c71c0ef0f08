// Path: crates/cli/src/commands/balance.rs

use crate::util;
use anyhow::{Context, Result};
use clap::Parser;
use koa_client::LedgerRead;
use koa_types::app::Address;
use std::path::Path;

#[derive(Parser, Debug)]
pub struct BalanceArgs {
    /// Address to query. Defaults to the signing account.
    pub address: Option<Address>,

    #[clap(long, value_enum, default_value = "primary")]
    pub account: util::Signer,
}

pub async fn run(config_path: &Path, args: BalanceArgs) -> Result<()> {
    let config = util::load_config(config_path)?;
    let client = util::algod(&config)?;
    let address = match args.address {
        Some(address) => address,
        None => util::account(&config, args.account)?.address(),
    };
    let balance = client
        .account_balance(&address)
        .await
        .with_context(|| format!("reading balance of {}", address))?;
    println!("{}: {} Algos", address, util::algos(balance));
    Ok(())
}
