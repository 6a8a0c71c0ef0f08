// Path: crates/cli/src/commands/keys.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use koa_crypto::Account;

#[derive(Parser, Debug)]
pub struct KeysArgs {
    #[clap(subcommand)]
    pub command: KeysCommands,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommands {
    /// Generate a new account.
    Generate,
    /// Derive the address and private key of a 25-word mnemonic.
    Inspect {
        /// The mnemonic, quoted as one argument.
        mnemonic: String,
    },
}

pub fn run(args: KeysArgs) -> Result<()> {
    match args.command {
        KeysCommands::Generate => {
            let account = Account::generate();
            let mnemonic = account.mnemonic()?;
            println!("--- New Account ---");
            println!("Address:     {}", account.address());
            println!("Private Key: {}", account.private_key_base64().as_str());
            println!("Mnemonic:    {}", mnemonic.as_str());
        }
        KeysCommands::Inspect { mnemonic } => {
            let account = Account::from_mnemonic(&mnemonic).context("Invalid mnemonic")?;
            println!("Address:     {}", account.address());
            println!("Private Key: {}", account.private_key_base64().as_str());
        }
    }
    Ok(())
}
