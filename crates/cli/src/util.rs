// Path: crates/cli/src/util.rs

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use koa_client::AlgodClient;
use koa_crypto::Account;
use koa_types::config::KoaConfig;
use std::path::Path;

/// Which configured account signs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Signer {
    #[default]
    Primary,
    Secondary,
}

pub fn load_config(path: &Path) -> Result<KoaConfig> {
    KoaConfig::load(path).with_context(|| format!("loading config from {}", path.display()))
}

pub fn account(config: &KoaConfig, signer: Signer) -> Result<Account> {
    let material = match signer {
        Signer::Primary => &config.primary,
        Signer::Secondary => config
            .secondary
            .as_ref()
            .ok_or_else(|| anyhow!("no [secondary] account configured"))?,
    };
    Account::from_key_material(material).with_context(|| format!("loading {:?} account", signer))
}

pub fn algod(config: &KoaConfig) -> Result<AlgodClient> {
    AlgodClient::from_config(&config.algod)
        .with_context(|| format!("connecting to {}", config.algod.endpoint))
}

/// Formats micro-Algos as Algos with six decimals.
pub fn algos(micro: u64) -> String {
    format!("{}.{:06}", micro / 1_000_000, micro % 1_000_000)
}
