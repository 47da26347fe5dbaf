//! Application configuration management.

use serde::Deserialize;
use uuid::Uuid;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Daily ledger rules.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Read cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Employee account settings.
    #[serde(default)]
    pub employees: EmployeeConfig,
    /// Cross-tenant access settings.
    #[serde(default)]
    pub access: AccessConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    604800 // 7 days
}

/// Daily ledger configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LedgerConfig {
    /// Reject transactions whose opening balance breaks the continuity chain.
    #[serde(default = "default_true")]
    pub strict_opening_balance: bool,
    /// Let admins push a mismatched opening balance through with a warning.
    #[serde(default = "default_true")]
    pub allow_admin_override: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            strict_opening_balance: true,
            allow_admin_override: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Read cache configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CacheConfig {
    /// Dashboard summary time-to-live in seconds.
    #[serde(default = "default_dashboard_ttl")]
    pub dashboard_ttl_secs: u64,
    /// Maximum number of cached dashboard summaries.
    #[serde(default = "default_dashboard_capacity")]
    pub dashboard_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dashboard_ttl_secs: default_dashboard_ttl(),
            dashboard_capacity: default_dashboard_capacity(),
        }
    }
}

fn default_dashboard_ttl() -> u64 {
    60
}

fn default_dashboard_capacity() -> u64 {
    1000
}

/// Employee account configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeConfig {
    /// Domain used when an employee email is derived from their name.
    #[serde(default = "default_email_domain")]
    pub email_domain: String,
}

impl Default for EmployeeConfig {
    fn default() -> Self {
        Self {
            email_domain: default_email_domain(),
        }
    }
}

fn default_email_domain() -> String {
    "cashbook.local".to_string()
}

/// Cross-tenant access configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessConfig {
    /// Admin user ids allowed to read the global dashboard. Empty disables it.
    #[serde(default)]
    pub global_view_admins: Vec<Uuid>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("CASHBOOK")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("access.global_view_admins"),
            )
            .build()?;

        config.try_deserialize()
    }
}
