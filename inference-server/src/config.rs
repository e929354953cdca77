//! Configuration module

use std::env;
use std::path::PathBuf;

use fallwatch_core::constants;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Model artifact produced by the trainer
    pub model_path: PathBuf,

    /// Keep a latest-reading snapshot and expose `/latest`
    pub live_reading: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            model_path: PathBuf::from(constants::DEFAULT_MODEL_PATH),
            live_reading: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            model_path: constants::get_model_path(),

            live_reading: env::var("LIVE_READING")
                .map(|s| parse_flag(&s))
                .unwrap_or(true),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    value != "false" && value != "0" && value != "off"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" FALSE "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert!(config.live_reading);
        assert!(config.model_path.ends_with("fall_detection_rf_model.json"));
    }
}
