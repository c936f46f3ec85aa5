//! Service config loader (strict parsing).
//!
//! YAML is parsed with unknown fields denied, then `TABLE_NAME` from the
//! environment is layered on top, then the result is validated.

pub mod schema;

use std::fs;

use visitcount_core::error::{Result, VisitCountError};

pub use schema::{ResponseSection, ServerSection, ServiceConfig, StoreBackend, StoreSection};

/// Env var naming the YAML file. Unset means built-in defaults.
pub const CONFIG_PATH_ENV: &str = "VISITCOUNT_CONFIG";
/// Env var naming the counter table.
pub const TABLE_NAME_ENV: &str = "TABLE_NAME";

const DEFAULT_YAML: &str = "version: 1\n";

/// Load from the process environment.
pub fn load_from_env() -> Result<ServiceConfig> {
    load_with(|k| std::env::var(k).ok())
}

/// Load using an arbitrary env lookup.
pub fn load_with<F>(env: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let yaml = match env(CONFIG_PATH_ENV) {
        Some(path) => fs::read_to_string(&path)
            .map_err(|e| VisitCountError::Config(format!("read config {path} failed: {e}")))?,
        None => DEFAULT_YAML.to_string(),
    };
    load_from_str_with(&yaml, env)
}

/// Parse and validate YAML alone; the table must then come from `store.table`.
pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    load_from_str_with(s, |_| None)
}

pub fn load_from_str_with<F>(s: &str, env: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| VisitCountError::Config(format!("invalid yaml: {e}")))?;

    if let Some(table) = env(TABLE_NAME_ENV) {
        cfg.store.table = Some(table);
    }

    cfg.validate()?;
    Ok(cfg)
}
