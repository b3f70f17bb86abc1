//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Verification-code configuration.
    #[serde(default)]
    pub verification: VerificationConfig,
    /// Mail transport configuration (absent disables outbound mail).
    #[serde(default)]
    pub mail: Option<MailConfig>,
    /// OAuth provider configuration.
    pub oauth: OAuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret key used to sign session cookie values. Rotating it logs out
    /// every session at once.
    pub cookie_secret: String,
    /// Max-age in days for "remember me" sessions.
    #[serde(default = "default_session_max_age_days")]
    pub session_max_age_days: u32,
}

/// Verification-code issuance and expiry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    /// Minutes a code stays valid after issuance.
    #[serde(default = "default_code_ttl_minutes")]
    pub code_ttl_minutes: u32,
    /// Issuance attempts allowed before the backoff window applies.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Minutes to wait after the attempt limit is reached.
    #[serde(default = "default_backoff_minutes")]
    pub backoff_minutes: u32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: default_code_ttl_minutes(),
            max_attempts: default_max_attempts(),
            backoff_minutes: default_backoff_minutes(),
        }
    }
}

/// SMTP mail transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// SMTP host.
    pub host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// SMTP username.
    #[serde(default)]
    pub username: Option<String>,
    /// SMTP password.
    #[serde(default)]
    pub password: Option<String>,
    /// From address.
    pub from_address: String,
    /// From display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

/// OAuth provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    /// Google OAuth2 credentials.
    pub google: ProviderConfig,
    /// Kakao OAuth2 credentials.
    pub kakao: ProviderConfig,
    /// Naver OAuth2 credentials.
    pub naver: ProviderConfig,
}

/// Credentials for a single OAuth provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Client ID issued by the provider.
    pub client_id: String,
    /// Client secret issued by the provider.
    pub client_secret: String,
    /// Redirect URI registered with the provider.
    pub redirect_uri: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_session_max_age_days() -> u32 {
    365
}

const fn default_code_ttl_minutes() -> u32 {
    60
}

const fn default_max_attempts() -> u32 {
    5
}

const fn default_backoff_minutes() -> u32 {
    15
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Graduon".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `GRADUON_ENV`)
    /// 3. Environment variables with `GRADUON_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("GRADUON_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GRADUON")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("GRADUON")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
