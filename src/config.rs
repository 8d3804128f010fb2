//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// TTLs are per resource type, not per entry; the observed policy for the
/// back-office views sits in the 5-30 minute band.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// TTL in seconds for business-card list views
    pub business_cards_ttl: u64,
    /// TTL in seconds for bank-account list views
    pub bank_accounts_ttl: u64,
    /// TTL in seconds for calendar statistics
    pub calendar_ttl: u64,
    /// TTL in seconds for the dashboard summary
    pub dashboard_ttl: u64,
    /// TTL in seconds for current blockchain balances
    pub balance_current_ttl: u64,
    /// TTL in seconds for historical (point-in-time) blockchain balances
    pub balance_historical_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `BUSINESS_CARDS_TTL` - Business-card list TTL in seconds (default: 600)
    /// - `BANK_ACCOUNTS_TTL` - Bank-account list TTL in seconds (default: 900)
    /// - `CALENDAR_TTL` - Calendar statistics TTL in seconds (default: 1800)
    /// - `DASHBOARD_TTL` - Dashboard summary TTL in seconds (default: 600)
    /// - `BALANCE_CURRENT_TTL` - Current balance TTL in seconds (default: 300)
    /// - `BALANCE_HISTORICAL_TTL` - Historical balance TTL in seconds (default: 1800)
    pub fn from_env() -> Self {
        Self {
            server_port: env_or("SERVER_PORT", 3000),
            cleanup_interval: env_or("CLEANUP_INTERVAL", 60),
            business_cards_ttl: env_or("BUSINESS_CARDS_TTL", 600),
            bank_accounts_ttl: env_or("BANK_ACCOUNTS_TTL", 900),
            calendar_ttl: env_or("CALENDAR_TTL", 1800),
            dashboard_ttl: env_or("DASHBOARD_TTL", 600),
            balance_current_ttl: env_or("BALANCE_CURRENT_TTL", 300),
            balance_historical_ttl: env_or("BALANCE_HISTORICAL_TTL", 1800),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cleanup_interval: 60,
            business_cards_ttl: 600,
            bank_accounts_ttl: 900,
            calendar_ttl: 1800,
            dashboard_ttl: 600,
            balance_current_ttl: 300,
            balance_historical_ttl: 1800,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// == TTL Policy ==
/// Per-resource TTLs as durations, derived from [`Config`] and shared with
/// handlers through application state.
#[derive(Debug, Clone, Copy)]
pub struct TtlPolicy {
    pub business_cards: Duration,
    pub bank_accounts: Duration,
    pub calendar: Duration,
    pub dashboard: Duration,
    pub balance_current: Duration,
    pub balance_historical: Duration,
}

impl From<&Config> for TtlPolicy {
    fn from(config: &Config) -> Self {
        Self {
            business_cards: Duration::from_secs(config.business_cards_ttl),
            bank_accounts: Duration::from_secs(config.bank_accounts_ttl),
            calendar: Duration::from_secs(config.calendar_ttl),
            dashboard: Duration::from_secs(config.dashboard_ttl),
            balance_current: Duration::from_secs(config.balance_current_ttl),
            balance_historical: Duration::from_secs(config.balance_historical_ttl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.business_cards_ttl, 600);
        assert_eq!(config.balance_current_ttl, 300);
        assert_eq!(config.balance_historical_ttl, 1800);
    }

    #[test]
    fn test_ttl_policy_from_config() {
        let config = Config::default();
        let ttl = TtlPolicy::from(&config);
        assert_eq!(ttl.business_cards, Duration::from_secs(600));
        assert_eq!(ttl.calendar, Duration::from_secs(1800));
        assert!(ttl.balance_historical > ttl.balance_current);
    }

    #[test]
    fn test_config_from_env_defaults() {
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("BUSINESS_CARDS_TTL");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.business_cards_ttl, 600);
    }
}
