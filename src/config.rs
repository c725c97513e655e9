//! Settings resolution: JSON file first, then command-line flags and
//! environment variables on top.

use crate::cli::Cli;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use vboxweb_api::{VboxConnectionConfig, VboxServiceConfig};
use vboxweb_soap::BasicAuth;

/// Contents of the `--config` file.
///
/// ```json
/// {
///   "endpoint": "https://vbox-host:18083/",
///   "insecureSkipVerify": true,
///   "basicAuth": { "username": "proxy", "password": "..." },
///   "username": "vbox",
///   "password": "...",
///   "service": { "waitTimeoutSeconds": 300 }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(flatten)]
    pub connection: VboxConnectionConfig,
    pub service: VboxServiceConfig,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply command-line (and environment) overrides.
    pub fn apply(&mut self, cli: &Cli) {
        let conn = &mut self.connection;
        if let Some(endpoint) = &cli.endpoint {
            conn.client.endpoint = endpoint.clone();
        }
        if let Some(user) = &cli.user {
            conn.username = user.clone();
        }
        if let Some(password) = &cli.password {
            conn.password = password.clone();
        }
        if let Some(user) = &cli.http_user {
            conn.client.basic_auth = Some(BasicAuth {
                username: user.clone(),
                password: cli.http_password.clone().unwrap_or_default(),
            });
        }
        if cli.insecure {
            conn.client.insecure_skip_verify = true;
        }
        if let Some(secs) = cli.timeout {
            conn.client.request_timeout_secs = Some(secs);
        }
    }
}

/// Settings for one invocation.
pub fn resolve(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.apply(cli);
    Ok(settings)
}
