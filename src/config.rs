//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Wagering Parameters ===
    /// Currency code for all accounts (ISO-4217 style, e.g. TND).
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Maximum selections per bet after deduplication.
    #[serde(default = "default_max_selections")]
    pub max_selections: usize,

    /// Default faucet credit when the request omits an amount.
    #[serde(default = "default_faucet_amount")]
    pub faucet_amount_minor_units: i64,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_currency() -> String {
    "TND".to_string()
}

fn default_max_selections() -> usize {
    30
}

fn default_faucet_amount() -> i64 {
    100_000 // 1000.00 in minor units
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!(
                "CURRENCY must be a 3-letter code, got {:?}",
                self.currency
            ));
        }

        if self.max_selections == 0 {
            return Err("MAX_SELECTIONS must be at least 1".to_string());
        }

        if self.faucet_amount_minor_units <= 0 {
            return Err("FAUCET_AMOUNT_MINOR_UNITS must be positive".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            max_selections: default_max_selections(),
            faucet_amount_minor_units: default_faucet_amount(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_currency(), "TND");
        assert_eq!(default_max_selections(), 30);
        assert_eq!(default_faucet_amount(), 100_000);
        assert_eq!(default_port(), 8080);
    }

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_currency() {
        let config = Config {
            currency: "dollars".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_max_selections() {
        let config = Config {
            max_selections: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_faucet() {
        let config = Config {
            faucet_amount_minor_units: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }
}
