//! Sensor Relay
//!
//! Reads `x,y,z` lines from the accelerometer board and forwards each one to
//! `/predict`. Every failure is logged and retried; the loop never exits.

pub mod client;
pub mod source;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use fallwatch_core::{constants, Reading};
use parking_lot::Mutex;

pub use client::{PredictClient, PredictReply};
pub use source::{LineSource, SerialSource};

pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyUSB0";
pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_PREDICT_URL: &str = "http://127.0.0.1:5000/predict";

/// Board reset time after the port is opened
const SETTLE_DELAY: Duration = Duration::from_secs(2);
const READ_TIMEOUT: Duration = Duration::from_secs(1);

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    /// Parse and POST every line
    Forward,
    /// Echo raw lines only
    Monitor,
}

impl FromStr for RelayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forward" => Ok(RelayMode::Forward),
            "monitor" => Ok(RelayMode::Monitor),
            other => Err(format!("unknown relay mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub serial_port: String,
    pub baud_rate: u32,
    pub read_timeout: Duration,
    pub settle_delay: Duration,
    pub predict_url: String,
    /// Pause after each forwarded reading
    pub poll_interval: Duration,
    /// Pause after any error
    pub retry_delay: Duration,
    pub mode: RelayMode,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            serial_port: DEFAULT_SERIAL_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: READ_TIMEOUT,
            settle_delay: SETTLE_DELAY,
            predict_url: DEFAULT_PREDICT_URL.to_string(),
            poll_interval: Duration::from_secs(5),
            retry_delay: Duration::from_secs(2),
            mode: RelayMode::Forward,
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            serial_port: constants::env_or("SERIAL_PORT", defaults.serial_port),
            baud_rate: constants::env_or("SERIAL_BAUD", defaults.baud_rate),
            predict_url: constants::env_or("PREDICT_URL", defaults.predict_url),
            poll_interval: Duration::from_secs(constants::env_or(
                "RELAY_POLL_INTERVAL_SECS",
                defaults.poll_interval.as_secs(),
            )),
            retry_delay: Duration::from_secs(constants::env_or(
                "RELAY_RETRY_DELAY_SECS",
                defaults.retry_delay.as_secs(),
            )),
            mode: constants::env_or("RELAY_MODE", defaults.mode),
            ..defaults
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("serial read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse reading {line:?}: {source}")]
    Parse {
        line: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serial reader task failed: {0}")]
    Reader(#[from] tokio::task::JoinError),
}

// ============================================================================
// LINE PARSING
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Empty,
    /// Not exactly three comma-separated fields
    Malformed(String),
    Reading(Reading),
}

/// Split a board line into a reading. A wrong field count is data noise
/// (`Malformed`); a non-numeric field is an error.
pub fn parse_line(raw: &str) -> Result<ParsedLine, RelayError> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(ParsedLine::Empty);
    }

    let fields: Vec<&str> = line.split(',').collect();
    let &[x, y, z] = fields.as_slice() else {
        return Ok(ParsedLine::Malformed(line.to_string()));
    };

    let parse = |field: &str| {
        field.trim().parse::<f64>().map_err(|source| RelayError::Parse {
            line: line.to_string(),
            source,
        })
    };

    Ok(ParsedLine::Reading(Reading::new(parse(x)?, parse(y)?, parse(z)?)))
}

// ============================================================================
// RELAY LOOP
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Read timed out with no data
    Idle,
    /// Empty or malformed line
    Skipped,
    /// Monitor mode: the raw line
    Echoed(String),
    Forwarded(PredictReply),
    /// Server answered with a non-200 status
    Rejected { status: u16, body: String },
}

pub struct Relay<S: LineSource> {
    config: RelayConfig,
    /// Shared with the blocking reader task
    source: Arc<Mutex<S>>,
    client: PredictClient,
}

impl<S: LineSource> Relay<S> {
    pub fn new(config: RelayConfig, source: S) -> Result<Self, RelayError> {
        let client = PredictClient::new(&config.predict_url)?;
        Ok(Self {
            config,
            source: Arc::new(Mutex::new(source)),
            client,
        })
    }

    /// Handle at most one line
    pub async fn step(&mut self) -> Result<StepOutcome, RelayError> {
        let source = Arc::clone(&self.source);
        let Some(line) = tokio::task::spawn_blocking(move || source.lock().read_line()).await?? else {
            return Ok(StepOutcome::Idle);
        };

        if self.config.mode == RelayMode::Monitor {
            let line = line.trim();
            if line.is_empty() {
                return Ok(StepOutcome::Skipped);
            }
            tracing::info!("serial: {}", line);
            return Ok(StepOutcome::Echoed(line.to_string()));
        }

        let reading = match parse_line(&line)? {
            ParsedLine::Empty => return Ok(StepOutcome::Skipped),
            ParsedLine::Malformed(line) => {
                tracing::warn!("Invalid data: {}", line);
                return Ok(StepOutcome::Skipped);
            }
            ParsedLine::Reading(reading) => reading,
        };

        tracing::debug!("Sending: {:?}", reading);
        self.client.predict(&reading).await
    }

    /// Run forever
    pub async fn run(&mut self) {
        tracing::info!(
            "Relaying {} -> {} ({:?} mode)",
            self.config.serial_port,
            self.config.predict_url,
            self.config.mode
        );

        loop {
            match self.step().await {
                Ok(StepOutcome::Forwarded(reply)) => {
                    tracing::info!(
                        "Prediction: {} ({}) prob_fall={:?}",
                        reply.label,
                        reply.prediction,
                        reply.prob_fall
                    );
                    tokio::time::sleep(self.config.poll_interval).await;
                }
                Ok(StepOutcome::Rejected { status, body }) => {
                    tracing::warn!("Server responded {}: {}", status, body);
                    tokio::time::sleep(self.config.poll_interval).await;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("{}", e);
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line(" 0.12, -0.5 ,0.98\r\n").unwrap(),
            ParsedLine::Reading(Reading::new(0.12, -0.5, 0.98))
        );
        assert_eq!(parse_line("  \r\n").unwrap(), ParsedLine::Empty);
        assert_eq!(parse_line("1,2").unwrap(), ParsedLine::Malformed("1,2".to_string()));
        assert_eq!(parse_line("1,2,3,4").unwrap(), ParsedLine::Malformed("1,2,3,4".to_string()));
        assert!(matches!(parse_line("1,abc,3"), Err(RelayError::Parse { .. })));
    }

    #[test]
    fn test_relay_mode_from_str() {
        assert_eq!("monitor".parse::<RelayMode>().unwrap(), RelayMode::Monitor);
        assert_eq!(" Forward ".parse::<RelayMode>().unwrap(), RelayMode::Forward);
        assert!("listen".parse::<RelayMode>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.serial_port, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.retry_delay, Duration::from_secs(2));
        assert_eq!(config.mode, RelayMode::Forward);
    }

    #[tokio::test]
    async fn test_step_reads_on_current_thread_runtime() {
        let config = RelayConfig { mode: RelayMode::Monitor, ..RelayConfig::default() };
        let lines: VecDeque<String> = ["0.1,0.2,0.3".to_string()].into();
        let mut relay = Relay::new(config, lines).unwrap();

        assert_eq!(relay.step().await.unwrap(), StepOutcome::Echoed("0.1,0.2,0.3".to_string()));
        assert_eq!(relay.step().await.unwrap(), StepOutcome::Idle);
    }
}
