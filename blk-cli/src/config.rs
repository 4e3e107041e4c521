use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::fs;

/// Run parameters loaded from TOML (§4.9), mirroring the teacher's own
/// `Config::new` + environment-variable override pattern.
#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub blocks_dir: String,
    pub output_csv: String,
    #[serde(default)]
    pub start_file_ordinal: u32,
    #[serde(default = "default_end_ordinal")]
    pub end_file_ordinal: u32,
    pub resolver_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub network: NetworkOverrides,
}

fn default_end_ordinal() -> u32 {
    0
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct NetworkOverrides {
    pub magic_mainnet: Option<u32>,
    pub magic_testnet: Option<u32>,
    pub max_output_value: Option<u64>,
}

fn get_env_var(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

impl Config {
    /// Parse config
    ///
    /// # Errors
    /// * config file does not exist
    /// * config file cannot be parsed as TOML
    pub fn new(file: &str) -> Result<Self> {
        let config_toml = fs::read_to_string(file).context("failed to read config file")?;
        let mut config: Config =
            toml::from_str(&config_toml).context("failed to parse config file")?;

        config.blocks_dir = get_env_var("BLK_DIR").unwrap_or(config.blocks_dir);
        config.resolver_endpoint = get_env_var("RESOLVER_ENDPOINT").or(config.resolver_endpoint);

        Ok(config)
    }
}
