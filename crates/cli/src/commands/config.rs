// Path: crates/cli/src/commands/config.rs

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use koa_types::config::{KoaConfig, CONFIG_TEMPLATE};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
pub struct ConfigCmdArgs {
    #[clap(subcommand)]
    pub command: ConfigSubCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubCommands {
    /// Write a starter config.toml.
    New {
        #[clap(long, default_value = "./configs")]
        out_dir: PathBuf,
        /// Replace an existing file.
        #[clap(long)]
        force: bool,
    },
    /// Parse a config file and report what it resolves to.
    Check {
        #[clap(default_value = koa_types::config::DEFAULT_CONFIG_PATH)]
        path: PathBuf,
    },
}

fn write_template(out_dir: &Path, force: bool) -> Result<PathBuf> {
    let path = out_dir.join("config.toml");
    if path.exists() && !force {
        bail!("{} already exists (pass --force to overwrite)", path.display());
    }
    fs::create_dir_all(out_dir)?;
    fs::write(&path, CONFIG_TEMPLATE).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn run(args: ConfigCmdArgs) -> Result<()> {
    match args.command {
        ConfigSubCommands::New { out_dir, force } => {
            let path = write_template(&out_dir, force)?;
            println!("Wrote {}", path.display());
        }
        ConfigSubCommands::Check { path } => {
            let config = KoaConfig::load(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            println!("Endpoint:        {}", config.algod.endpoint);
            println!("Primary account: {}", !config.primary.is_empty());
            println!("Second account:  {}", config.secondary.is_some());
            match config.app_id {
                Some(id) => println!("App ID:          {}", id),
                None => println!("App ID:          <not deployed>"),
            }
            println!("Reign period:    {}s", config.reign_period_secs);
        }
    }
    Ok(())
}
