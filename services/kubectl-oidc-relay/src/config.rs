//! Configuration types and loading
//!
//! Config precedence: env vars > config file > defaults. The config file is
//! optional; a deployment may supply everything through CLIENT_ID,
//! CLIENT_SECRET, CALLBACK_URL and ALLOWED_DOMAIN. The client secret is
//! never stored in the TOML directly; it comes from the env var or from
//! `client_secret_file`.

use common::Secret;
use google_oidc::Endpoints;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "kubectl-oidc-relay.toml";

/// Resolved, validated configuration. Built once at startup and shared
/// read-only between handlers.
#[derive(Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub oauth: OAuthConfig,
    pub provider: Endpoints,
    pub output: OutputConfig,
}

/// HTTP listener and outbound call settings
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Per outbound call to the identity provider
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

/// OAuth client registration and domain policy
#[derive(Debug)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub callback_url: String,
    pub allowed_domain: String,
}

/// Settings for the rendered kubectl snippet
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Command the snippet invokes, e.g. a wrapper that selects a cluster
    #[serde(default = "default_command")]
    pub command: String,
}

/// On-disk shape; every section is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    oauth: OAuthFileConfig,
    #[serde(default)]
    provider: Endpoints,
    #[serde(default)]
    output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
struct OAuthFileConfig {
    client_id: Option<String>,
    client_secret_file: Option<PathBuf>,
    callback_url: Option<String>,
    allowed_domain: Option<String>,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 80))
}

fn default_timeout() -> u64 {
    5
}

fn default_max_connections() -> usize {
    1000
}

fn default_command() -> String {
    "kubectl".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            timeout_secs: default_timeout(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from an optional TOML file, then overlay
    /// environment variables and validate.
    ///
    /// Client secret resolution order:
    /// 1. CLIENT_SECRET env var
    /// 2. oauth.client_secret_file path from config
    pub fn load(path: Option<&Path>) -> common::Result<Self> {
        let file = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str(&contents)?
            }
            None => FileConfig::default(),
        };
        Self::resolve(file)
    }

    fn resolve(file: FileConfig) -> common::Result<Self> {
        let FileConfig {
            server,
            oauth,
            provider,
            output,
        } = file;

        let client_id = required("oauth.client_id", "CLIENT_ID", oauth.client_id)?;
        let callback_url = required("oauth.callback_url", "CALLBACK_URL", oauth.callback_url)?;
        let allowed_domain =
            required("oauth.allowed_domain", "ALLOWED_DOMAIN", oauth.allowed_domain)?;

        let client_secret = match env_value("CLIENT_SECRET") {
            Some(secret) => Some(Secret::new(secret)),
            None => match oauth.client_secret_file {
                Some(ref path) => Secret::from_file(path)?,
                None => None,
            },
        };
        let client_secret = client_secret.ok_or(common::Error::MissingSetting {
            setting: "oauth.client_secret_file",
            env: "CLIENT_SECRET",
        })?;

        let config = Config {
            server,
            oauth: OAuthConfig {
                client_id,
                client_secret,
                callback_url,
                allowed_domain,
            },
            provider,
            output,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> common::Result<()> {
        require_http_url("callback_url", &self.oauth.callback_url)?;
        for (name, url) in self.provider.urls() {
            require_http_url(name, url)?;
        }

        if self.server.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.server.max_connections == 0 {
            return Err(common::Error::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.output.command.trim().is_empty() {
            return Err(common::Error::Config(
                "output.command must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Resolve config file path from CLI arg, CONFIG_PATH env var, or the
    /// default file if it exists in the working directory.
    pub fn resolve_path(cli_path: Option<&str>) -> Option<PathBuf> {
        if let Some(p) = cli_path {
            return Some(PathBuf::from(p));
        }
        if let Some(p) = env_value("CONFIG_PATH") {
            return Some(PathBuf::from(p));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
    }
}

/// Non-empty env var value, if set.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Env var wins over the file value; empty strings count as missing.
fn required(
    setting: &'static str,
    env: &'static str,
    file_value: Option<String>,
) -> common::Result<String> {
    env_value(env)
        .or(file_value.filter(|v| !v.trim().is_empty()))
        .ok_or(common::Error::MissingSetting { setting, env })
}

fn require_http_url(name: &str, url: &str) -> common::Result<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(common::Error::Config(format!(
            "{name} must start with http:// or https://, got: {url}"
        )));
    }
    Ok(())
}
