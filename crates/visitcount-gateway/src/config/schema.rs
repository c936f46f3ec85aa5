use std::net::SocketAddr;

use serde::Deserialize;
use visitcount_core::error::{Result, VisitCountError};
use visitcount_core::response::{FieldName, ResponseContract};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub response: ResponseSection,
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(VisitCountError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.store.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Route serving the counter.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.path.starts_with('/') {
            return Err(VisitCountError::Config(
                "server.path must start with '/'".into(),
            ));
        }
        // One literal route: no captures, wildcards, or empty segments.
        if self.path.contains([':', '*', '{', '}']) || self.path.contains("//") {
            return Err(VisitCountError::Config(format!(
                "server.path must be a literal path without ':', '*', '{{', '}}' or empty segments: {}",
                self.path
            )));
        }
        if matches!(self.path.as_str(), "/healthz" | "/readyz" | "/metrics") {
            return Err(VisitCountError::Config(format!(
                "server.path collides with ops route: {}",
                self.path
            )));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            VisitCountError::Config(format!(
                "server.listen must be a valid SocketAddr: {}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_path() -> String {
    "/v1/visits".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::File => "file",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Always overridden by `TABLE_NAME` when loading from the environment.
    #[serde(default)]
    pub table: Option<String>,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            table: None,
            data_dir: default_data_dir(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        let table = self.table_name()?;
        validate_table_name(table)?;
        if self.backend == StoreBackend::File && self.data_dir.trim().is_empty() {
            return Err(VisitCountError::Config(
                "store.data_dir must not be empty for the file backend".into(),
            ));
        }
        Ok(())
    }

    pub fn table_name(&self) -> Result<&str> {
        self.table
            .as_deref()
            .ok_or_else(|| VisitCountError::Config("TABLE_NAME is not set".into()))
    }
}

fn default_data_dir() -> String {
    "./data".into()
}

/// Table names: 3..=255 chars of `[A-Za-z0-9_.-]`.
pub fn validate_table_name(name: &str) -> Result<()> {
    if !(3..=255).contains(&name.len()) {
        return Err(VisitCountError::Config(format!(
            "table name must be 3..=255 characters: {name:?}"
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(VisitCountError::Config(format!(
            "table name contains invalid character {c:?}: {name:?}"
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseSection {
    #[serde(default)]
    pub field_name: FieldName,

    #[serde(default = "default_include_cors")]
    pub include_cors: bool,
}

impl Default for ResponseSection {
    fn default() -> Self {
        Self {
            field_name: FieldName::default(),
            include_cors: default_include_cors(),
        }
    }
}

impl ResponseSection {
    pub fn contract(&self) -> ResponseContract {
        ResponseContract {
            field_name: self.field_name,
            include_cors: self.include_cors,
        }
    }
}

fn default_include_cors() -> bool {
    true
}
