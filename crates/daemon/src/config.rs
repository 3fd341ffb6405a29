//! Server settings
//!
//! Resolution order: built-in defaults, then `paps.toml` (or the file named by
//! `PAPS_CONFIG`), then `PAPS_*` environment variables.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use paps_core::application::rate_limiter::{DEFAULT_BURST, DEFAULT_RATE_PER_SEC};
use paps_core::domain::DEFAULT_SUBSCRIPTION_PRICE;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "paps.toml";
pub const DEV_JWT_SECRET: &str = "paps-dev-secret-change-me";

const ENV_PREFIX: &str = "PAPS";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: String,
    pub http_host: String,
    pub http_port: u16,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub bcrypt_cost: u32,
    pub subscription_price: f64,
    pub sweep_interval_secs: u64,
    pub rate_limit_burst: u32,
    pub rate_limit_rate: u32,
    /// `pretty` or `json`
    pub log_format: String,
    /// Daily-rolling log files are written here when set
    pub log_dir: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let file = std::env::var("PAPS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::from_sources(Some(&file), ENV_PREFIX)
    }

    pub(crate) fn from_sources(file: Option<&str>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("db_path", "~/.paps/paps.db")?
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 3000)?
            .set_default("rpc_host", paps_api_rpc::server::DEFAULT_RPC_HOST)?
            .set_default("rpc_port", paps_api_rpc::server::DEFAULT_RPC_PORT as i64)?
            .set_default("jwt_secret", DEV_JWT_SECRET)?
            .set_default(
                "token_ttl_secs",
                paps_infra_security::token::DEFAULT_TTL_SECS,
            )?
            .set_default("bcrypt_cost", paps_infra_security::password::DEFAULT_COST as i64)?
            .set_default("subscription_price", DEFAULT_SUBSCRIPTION_PRICE)?
            .set_default("sweep_interval_secs", 3600)?
            .set_default("rate_limit_burst", DEFAULT_BURST as i64)?
            .set_default("rate_limit_rate", DEFAULT_RATE_PER_SEC as i64)?
            .set_default("log_format", "pretty")?;

        if let Some(path) = file {
            let path = shellexpand::tilde(path).into_owned();
            builder = builder.add_source(File::with_name(&path).required(false));
        }

        let mut settings: Settings = builder
            .add_source(Environment::with_prefix(env_prefix))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.db_path = expand_db_path(&settings.db_path);
        settings.log_dir = settings
            .log_dir
            .filter(|d| !d.trim().is_empty())
            .map(|d| shellexpand::tilde(&d).into_owned());
        Ok(settings)
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn expand_db_path(path: &str) -> String {
    if path == ":memory:" {
        path.to_string()
    } else {
        shellexpand::tilde(path).into_owned()
    }
}
