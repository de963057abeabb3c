//! Application configuration management.

use std::collections::HashMap;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Ledger engine configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Account resolver configuration.
    #[serde(default)]
    pub resolver: ResolverConfig,
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
    /// Seed a demo user with default accounts and sample movements at startup.
    #[serde(default)]
    pub seed_demo: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            seed_demo: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Ledger engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Upper bound for a single transaction amount, in minor units.
    #[serde(default = "default_max_amount_minor")]
    pub max_amount_minor: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_amount_minor: default_max_amount_minor(),
        }
    }
}

fn default_max_amount_minor() -> i64 {
    100_000_000 // one million in major units
}

/// Account resolver configuration.
///
/// The alias table maps a known free-text name (e.g., a card brand) to the
/// display name of a previously provisioned account. It is data, not code:
/// the matching policy evolves without touching commit logic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolverConfig {
    /// Alias → account display name.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Layering, later sources win: `config/default` → `config/{RUN_MODE}` →
    /// `TALLY__`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
