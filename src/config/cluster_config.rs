//! Per-cluster connection configuration
//!
//! Targets come from an INI file with one section per cluster; the
//! section name becomes the row's source label. Only `host` is
//! mandatory; everything else has a sensible default.
//!
//! ```ini
//! [production-cache]
//! host = cache.example.internal
//! port = 6379
//! password = hunter2
//! tls = true
//! ca_cert = /etc/ssl/ca.pem
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Leading `::` disambiguates the config crate from this module
use ::config::{Config, File, FileFormat};
use serde::Deserialize;

use super::tls_config::TlsConfig;
use crate::client::ConnectionFactory;
use crate::utils::{Result, SamplerError};

fn default_port() -> u16 {
    6379
}

/// One `[section]` of the configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub tls: bool,
    #[serde(default)]
    pub tls_skip_verify: bool,
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
    #[serde(default)]
    pub client_cert: Option<PathBuf>,
    #[serde(default)]
    pub client_key: Option<PathBuf>,
}

impl ClusterConfig {
    /// Build the connection factory for this cluster's nodes
    pub fn connection_factory(&self) -> ConnectionFactory {
        let tls_config = if self.tls {
            Some(TlsConfig {
                skip_verify: self.tls_skip_verify,
                ca_cert: self.ca_cert.clone(),
                client_cert: self.client_cert.clone(),
                client_key: self.client_key.clone(),
                sni: None,
            })
        } else {
            None
        };

        ConnectionFactory {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            write_timeout: Duration::from_secs(30),
            tls_config,
            auth_password: self.password.clone(),
            auth_username: self.username.clone(),
        }
    }
}

/// Load all cluster sections from an INI file, ordered by section name
pub fn load_clusters(path: &Path) -> Result<Vec<(String, ClusterConfig)>> {
    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Ini))
        .build()
        .map_err(|e| SamplerError::Config(format!("{}: {}", path.display(), e)))?;

    let sections: BTreeMap<String, ClusterConfig> = settings
        .try_deserialize()
        .map_err(|e| SamplerError::Config(format!("{}: {}", path.display(), e)))?;

    if sections.is_empty() {
        return Err(SamplerError::Config(format!(
            "{}: no cluster sections defined",
            path.display()
        )));
    }

    Ok(sections.into_iter().collect())
}
