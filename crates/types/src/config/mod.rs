// Path: crates/types/src/config/mod.rs

//! Client configuration structures and the layered loader.
//!
//! Values are resolved in three layers: the base TOML file, an optional
//! per-environment file selected by `ENVIRONMENT`, and `KOA_*` environment
//! variable overrides.
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "./configs/config.toml";
/// Environment variable selecting the per-environment overlay file.
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";
/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "KOA_";

/// A starter configuration written by `koa config new`.
pub const CONFIG_TEMPLATE: &str = r#"# King of Algo client configuration.
# Any value can be overridden with a KOA_ environment variable,
# e.g. KOA_PRIVATE_KEY, KOA_MNEMONIC_WORDS, KOA_APP_ID, KOA_ALGOD_ENDPOINT.

# Primary account: either a base64 private key or a 25-word mnemonic.
private_key = ""
# mnemonic_words = ""

# Filled in after `koa deploy`.
# app_id = 0

# Protection window granted to each new king, in seconds.
reign_period_secs = 604800

[algod]
endpoint = "http://localhost:4001"
api_token = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"

# Optional second account, used by the integration scenarios.
# [secondary]
# private_key = ""
"#;

/// Signing key material. Exactly one of the two fields should be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMaterial {
    /// Base64 private key (64-byte seed and public key, or a 32-byte seed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// A 25-word mnemonic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic_words: Option<String>,
}

impl KeyMaterial {
    /// True if neither field holds a non-empty value.
    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.private_key) && blank(&self.mnemonic_words)
    }
}

/// Connection settings for the node's REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgodConfig {
    /// Base URL of the node.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Value of the `X-Algo-API-Token` header.
    #[serde(default)]
    pub api_token: String,
    /// `User-Agent` sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    "http://localhost:4001".to_string()
}

fn default_user_agent() -> String {
    format!("koa/{}", env!("CARGO_PKG_VERSION"))
}

fn default_reign_period() -> u64 {
    // One week.
    604_800
}

fn default_dryrun_dir() -> PathBuf {
    PathBuf::from("dryruns")
}

impl Default for AlgodConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_token: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KoaConfig {
    /// Key material for the primary account.
    #[serde(flatten)]
    pub primary: KeyMaterial,
    /// Node connection settings.
    #[serde(default)]
    pub algod: AlgodConfig,
    /// Optional key material for a second account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<KeyMaterial>,
    /// The deployed contract's application id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u64>,
    /// Reign period used when deploying, in seconds.
    #[serde(default = "default_reign_period")]
    pub reign_period_secs: u64,
    /// Directory that receives persisted simulation requests.
    #[serde(default = "default_dryrun_dir")]
    pub dryrun_dir: PathBuf,
}

impl Default for KoaConfig {
    fn default() -> Self {
        Self {
            primary: KeyMaterial::default(),
            algod: AlgodConfig::default(),
            secondary: None,
            app_id: None,
            reign_period_secs: default_reign_period(),
            dryrun_dir: default_dryrun_dir(),
        }
    }
}

impl KoaConfig {
    /// Loads the configuration from `path`, honoring `ENVIRONMENT` and `KOA_*` overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let environment = std::env::var(ENVIRONMENT_VAR).ok();
        let resolved = resolve_path(path, environment.as_deref());
        let mut config = Self::from_file(&resolved)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parses a single TOML file without applying any overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Applies `KOA_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(v) = var("PRIVATE_KEY") {
            self.primary.private_key = Some(v);
        }
        if let Some(v) = var("MNEMONIC_WORDS") {
            self.primary.mnemonic_words = Some(v);
        }
        if let Some(v) = var("APP_ID") {
            let id = v.trim().parse().map_err(|e| ConfigError::InvalidValue {
                field: "KOA_APP_ID",
                reason: format!("{}", e),
            })?;
            self.app_id = Some(id);
        }
        if let Some(v) = var("REIGN_PERIOD_SECS") {
            self.reign_period_secs = v.trim().parse().map_err(|e| ConfigError::InvalidValue {
                field: "KOA_REIGN_PERIOD_SECS",
                reason: format!("{}", e),
            })?;
        }
        if let Some(v) = var("ALGOD_ENDPOINT") {
            self.algod.endpoint = v;
        }
        if let Some(v) = var("ALGOD_API_TOKEN") {
            self.algod.api_token = v;
        }
        Ok(())
    }

    /// Returns the application id or a `Missing` error.
    pub fn require_app_id(&self) -> Result<u64, ConfigError> {
        match self.app_id {
            Some(id) if id > 0 => Ok(id),
            _ => Err(ConfigError::Missing("app_id")),
        }
    }
}

/// Picks `<stem>.<environment>.toml` next to `base` when it exists.
pub fn resolve_path(base: &Path, environment: Option<&str>) -> PathBuf {
    let env = match environment.map(str::trim) {
        Some(env) if !env.is_empty() => env,
        _ => return base.to_path_buf(),
    };
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string());
    let candidate = base.with_file_name(format!("{}.{}.toml", stem, env));
    if candidate.exists() {
        candidate
    } else {
        base.to_path_buf()
    }
}
