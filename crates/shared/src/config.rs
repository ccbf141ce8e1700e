//! Application configuration management.
//!
//! Configuration is built once at process start and handed to whichever
//! component needs it. Nothing in the workspace reads configuration lazily.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Report generation settings.
    #[serde(default)]
    pub reporting: ReportingConfig,
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

/// Report generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportingConfig {
    /// ISO 4217 code amounts are reported in.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Utilization percentage at which a report raises a budget alert.
    #[serde(default = "default_alert_threshold")]
    pub budget_alert_threshold_percent: Decimal,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            budget_alert_threshold_percent: default_alert_threshold(),
        }
    }
}

fn default_currency() -> String {
    "KRW".to_string()
}

fn default_alert_threshold() -> Decimal {
    Decimal::from(90)
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `BUILDCOST__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BUILDCOST").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_applies_defaults() {
        temp_env::with_vars(
            [
                ("BUILDCOST__DATABASE__URL", Some("postgres://localhost/buildcost")),
                ("BUILDCOST__SERVER__PORT", None),
                ("BUILDCOST__REPORTING__CURRENCY", None),
                ("BUILDCOST__REPORTING__BUDGET_ALERT_THRESHOLD_PERCENT", None),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/buildcost");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.reporting, ReportingConfig::default());
            },
        );
    }

    #[test]
    fn test_load_reads_reporting_overrides() {
        temp_env::with_vars(
            [
                ("BUILDCOST__DATABASE__URL", Some("postgres://localhost/buildcost")),
                ("BUILDCOST__REPORTING__CURRENCY", Some("USD")),
                (
                    "BUILDCOST__REPORTING__BUDGET_ALERT_THRESHOLD_PERCENT",
                    Some("75.5"),
                ),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.reporting.currency, "USD");
                assert_eq!(config.reporting.budget_alert_threshold_percent, dec!(75.5));
            },
        );
    }

    #[test]
    fn test_load_requires_database_url() {
        temp_env::with_vars([("BUILDCOST__DATABASE__URL", None::<&str>)], || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_reporting_defaults() {
        let reporting = ReportingConfig::default();
        assert_eq!(reporting.currency, "KRW");
        assert_eq!(reporting.budget_alert_threshold_percent, dec!(90));
    }
}
