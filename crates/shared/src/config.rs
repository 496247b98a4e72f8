//! Application configuration management.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
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
    /// Accounts used for drafts created from chat messages.
    pub ingest: IngestConfig,
    /// Sequential code formats.
    #[serde(default)]
    pub codes: CodeConfig,
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

/// Ledger accounts applied to drafts created by the message webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Target account for lines matched to a catalog item.
    pub inventory_account_id: Uuid,
    /// Target account for ambiguous and unmatched lines.
    pub expense_account_id: Uuid,
    /// Cash or bank account the reimbursement is paid from.
    #[serde(default)]
    pub cash_account_id: Option<Uuid>,
    /// Time zone of the senders. Dates written without a year resolve
    /// against the current date in this zone.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

impl IngestConfig {
    /// Returns the calendar date of `now` in the senders' time zone.
    #[must_use]
    pub fn local_today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.timezone).date_naive()
    }
}

fn default_timezone() -> Tz {
    Tz::Asia__Jakarta
}

/// Prefixes and width for sequential human-readable codes.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeConfig {
    /// Prefix of ledger transaction codes.
    #[serde(default = "default_transaction_prefix")]
    pub transaction_prefix: String,
    /// Prefix of reimbursement batch codes.
    #[serde(default = "default_batch_prefix")]
    pub batch_prefix: String,
    /// Zero-padded width of the numeric suffix.
    #[serde(default = "default_code_width")]
    pub width: usize,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            transaction_prefix: default_transaction_prefix(),
            batch_prefix: default_batch_prefix(),
            width: default_code_width(),
        }
    }
}

fn default_transaction_prefix() -> String {
    "PCS".to_string()
}

fn default_batch_prefix() -> String {
    "RMB".to_string()
}

fn default_code_width() -> usize {
    6
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
                config::Environment::with_prefix("TALLY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY: &str = "0190a3c4-0000-7000-8000-000000000001";
    const EXPENSE: &str = "0190a3c4-0000-7000-8000-000000000002";

    #[test]
    fn test_load_from_environment_with_defaults() {
        temp_env::with_vars(
            [
                ("TALLY__DATABASE__URL", Some("postgres://localhost/tally")),
                ("TALLY__INGEST__INVENTORY_ACCOUNT_ID", Some(INVENTORY)),
                ("TALLY__INGEST__EXPENSE_ACCOUNT_ID", Some(EXPENSE)),
                ("RUN_MODE", Some("test")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/tally");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.ingest.inventory_account_id.to_string(), INVENTORY);
                assert!(config.ingest.cash_account_id.is_none());
                assert_eq!(config.codes.transaction_prefix, "PCS");
                assert_eq!(config.codes.batch_prefix, "RMB");
                assert_eq!(config.codes.width, 6);
                assert_eq!(config.ingest.timezone, Tz::Asia__Jakarta);
            },
        );
    }

    #[test]
    fn test_timezone_override() {
        temp_env::with_vars(
            [
                ("TALLY__DATABASE__URL", Some("postgres://localhost/tally")),
                ("TALLY__INGEST__INVENTORY_ACCOUNT_ID", Some(INVENTORY)),
                ("TALLY__INGEST__EXPENSE_ACCOUNT_ID", Some(EXPENSE)),
                ("TALLY__INGEST__TIMEZONE", Some("Asia/Makassar")),
                ("RUN_MODE", Some("test")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.ingest.timezone, Tz::Asia__Makassar);
            },
        );
    }

    fn ingest(timezone: Tz) -> IngestConfig {
        IngestConfig {
            inventory_account_id: INVENTORY.parse().unwrap(),
            expense_account_id: EXPENSE.parse().unwrap(),
            cash_account_id: None,
            timezone,
        }
    }

    #[test]
    fn test_local_today_crosses_midnight_before_utc() {
        // 00:30 in Jakarta on 20 Jan is still 19 Jan in UTC.
        let now = "2026-01-19T17:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(
            ingest(Tz::Asia__Jakarta).local_today(now),
            NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
        );
        assert_eq!(
            ingest(Tz::UTC).local_today(now),
            NaiveDate::from_ymd_opt(2026, 1, 19).unwrap()
        );
    }

    #[test]
    fn test_missing_ingest_accounts_fail() {
        temp_env::with_vars(
            [
                ("TALLY__DATABASE__URL", Some("postgres://localhost/tally")),
                ("TALLY__INGEST__INVENTORY_ACCOUNT_ID", None::<&str>),
                ("TALLY__INGEST__EXPENSE_ACCOUNT_ID", None),
                ("RUN_MODE", Some("test")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
