use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::account::models::AccountType;
use crate::session::errors::AdminCredentialsError;
use crate::session::models::AdminCredentials;
use crate::session::models::IssuancePolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub token: TokenConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub grpc_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    /// PEM encoded P-256 private key (SEC1 or PKCS#8)
    pub private_key_path: String,
    #[serde(default)]
    pub compression: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// Stamp every issued session with this class instead of the requested one
    #[serde(default)]
    pub fixed_account_type: Option<AccountType>,
}

impl SessionConfig {
    pub fn issuance_policy(&self) -> IssuancePolicy {
        match self.fixed_account_type {
            Some(account_type) => IssuancePolicy::Fixed(account_type),
            None => IssuancePolicy::AsRequested,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    /// `username:password-hash`
    pub credentials: String,
}

impl AdminConfig {
    pub fn credentials(&self) -> Result<AdminCredentials, AdminCredentialsError> {
        self.credentials.parse()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, TOKEN__PRIVATE_KEY_PATH, ADMIN__CREDENTIALS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: ADMIN__CREDENTIALS=admin:$argon2id$... overrides admin.credentials
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}
