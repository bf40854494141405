//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The file path defaults to `config.yaml` but can be specified
//! via the `-f` flag or the `UPLINK_CONFIG` environment variable.
//!
//! ## Loading Priority
//!
//! Sources are merged in order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `UPLINK_` override
//!    YAML values; use double underscores for nested fields, for example
//!    `UPLINK_DRIVE__ROOT_FOLDER_ID=xyz` sets `drive.root_folder_id`
//! 3. **Bare credential variables** - `GOOGLE_CLIENT_ID`,
//!    `GOOGLE_CLIENT_SECRET`, `GOOGLE_REFRESH_TOKEN`, `REDIRECT_URI` and
//!    `PORT` are accepted as-is for compatibility with existing deploy
//!    environments

use clap::Parser;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "UPLINK_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have defaults; only the Drive credentials are required.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Upload handling limits
    pub upload: UploadConfig,
    /// Cross-origin policy for the HTTP surface
    pub cors: CorsConfig,
    /// Remote Drive credentials and endpoints
    pub drive: DriveConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            upload: UploadConfig::default(),
            cors: CorsConfig::default(),
            drive: DriveConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes. Uploads are buffered fully in
    /// memory, so this also bounds per-request memory use. The request body
    /// limit gets a small allowance on top of this value for multipart
    /// framing, so a file of exactly this size is accepted.
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` permits any origin
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriveConfig {
    /// OAuth2 client ID
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// OAuth2 redirect URI registered with the client
    pub redirect_uri: String,
    /// Long-lived refresh token used to mint access tokens
    pub refresh_token: String,
    /// Folder the relay treats as the top-level container. The default
    /// `"root"` is the service's own sentinel for "My Drive".
    pub root_folder_id: String,
    /// Drive v3 API base URL
    pub api_base_url: Url,
    /// Drive v3 media upload base URL
    pub upload_base_url: Url,
    /// OAuth2 token endpoint
    pub token_url: Url,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            refresh_token: String::new(),
            root_folder_id: "root".to_string(),
            api_base_url: Url::parse("https://www.googleapis.com/drive/v3").expect("hardcoded URL is valid"),
            upload_base_url: Url::parse("https://www.googleapis.com/upload/drive/v3").expect("hardcoded URL is valid"),
            token_url: Url::parse("https://oauth2.googleapis.com/token").expect("hardcoded URL is valid"),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("UPLINK_").split("__"))
            // Bare credential variables the deploy environments already export
            .merge(Env::raw().only(&["GOOGLE_CLIENT_ID"]).map(|_| "drive.client_id".into()).split("."))
            .merge(
                Env::raw()
                    .only(&["GOOGLE_CLIENT_SECRET"])
                    .map(|_| "drive.client_secret".into())
                    .split("."),
            )
            .merge(
                Env::raw()
                    .only(&["GOOGLE_REFRESH_TOKEN"])
                    .map(|_| "drive.refresh_token".into())
                    .split("."),
            )
            .merge(Env::raw().only(&["REDIRECT_URI"]).map(|_| "drive.redirect_uri".into()).split("."))
            .merge(Env::raw().only(&["PORT"]))
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.drive.client_id.is_empty() || self.drive.client_secret.is_empty() || self.drive.refresh_token.is_empty() {
            anyhow::bail!(
                "Config validation: Drive credentials are incomplete. Set drive.client_id, \
                 drive.client_secret and drive.refresh_token in the config file, or export \
                 GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REFRESH_TOKEN."
            );
        }

        if self.upload.max_file_size == 0 {
            anyhow::bail!("Config validation: upload.max_file_size must be greater than zero");
        }

        if self.cors.allowed_origins.is_empty() {
            anyhow::bail!("Config validation: cors.allowed_origins must not be empty");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
