//! Client configuration.

use serde::{Deserialize, Serialize};

/// Default `vboxwebsrv` listen address.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:18083/";

/// HTTP Basic credentials, sent on every request when configured.
///
/// These protect a reverse proxy in front of the web service; they are
/// unrelated to the `IWebsessionManager::logon` credentials.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Transport settings for a [`SoapClient`](crate::SoapClient).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Web service URL, e.g. `http://vbox-host:18083/`
    pub endpoint: String,
    /// Accept any TLS certificate (self-signed `vboxwebsrv` setups)
    pub insecure_skip_verify: bool,
    pub basic_auth: Option<BasicAuth>,
    /// Overall per-request timeout. The connect timeout is fixed.
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            insecure_skip_verify: false,
            basic_auth: None,
            request_timeout_secs: None,
            user_agent: concat!("vboxweb/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn insecure(mut self, skip_verify: bool) -> Self {
        self.insecure_skip_verify = skip_verify;
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }
}
