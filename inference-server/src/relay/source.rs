//! Line sources for the relay

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, ErrorKind};

use serialport::SerialPort;

use super::{RelayConfig, RelayError};

/// Blocking line reader; `Ok(None)` means nothing arrived before the timeout
pub trait LineSource: Send + 'static {
    fn read_line(&mut self) -> Result<Option<String>, RelayError>;
}

pub struct SerialSource {
    reader: BufReader<Box<dyn SerialPort>>,
    /// Bytes of a line interrupted by a read timeout
    pending: Vec<u8>,
}

impl SerialSource {
    pub fn open(config: &RelayConfig) -> Result<Self, RelayError> {
        let port = serialport::new(&config.serial_port, config.baud_rate)
            .timeout(config.read_timeout)
            .open()?;

        tracing::info!("Opened {} at {} baud", config.serial_port, config.baud_rate);
        Ok(Self {
            reader: BufReader::new(port),
            pending: Vec::new(),
        })
    }
}

impl LineSource for SerialSource {
    fn read_line(&mut self) -> Result<Option<String>, RelayError> {
        match self.reader.read_until(b'\n', &mut self.pending) {
            Ok(0) if self.pending.is_empty() => Ok(None),
            Ok(_) => {
                let line = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                Ok(Some(line))
            }
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Canned lines, for replaying a capture
impl LineSource for VecDeque<String> {
    fn read_line(&mut self) -> Result<Option<String>, RelayError> {
        Ok(self.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_source_drains_in_order() {
        let mut source: VecDeque<String> = ["a", "b"].into_iter().map(String::from).collect();

        assert_eq!(source.read_line().unwrap().as_deref(), Some("a"));
        assert_eq!(source.read_line().unwrap().as_deref(), Some("b"));
        assert_eq!(source.read_line().unwrap(), None);
    }
}
