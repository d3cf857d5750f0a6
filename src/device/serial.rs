//! Serial transport
//!
//! Opens the Brain's serial port and exposes it as a plain byte stream.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::SerialPort;

use crate::config::Config;
use crate::error::{BrainError, Result};

/// How long a single port read waits before looping when no timeout is configured
const IDLE_POLL: Duration = Duration::from_millis(1000);

/// Exclusive handle on one serial port
pub struct SerialTransport {
    port: Box<dyn SerialPort>,

    /// Keep waiting through port timeouts instead of reporting them
    block: bool,
}

impl SerialTransport {
    /// Open the device named in `config`
    pub fn open(config: &Config) -> Result<Self> {
        if config.device.is_empty() {
            return Err(BrainError::Config("no serial device given".to_string()));
        }

        let block = config.read_timeout_ms == 0;
        let timeout = if block {
            IDLE_POLL
        } else {
            Duration::from_millis(config.read_timeout_ms)
        };

        let port = serialport::new(config.device.as_str(), config.baud_rate)
            .timeout(timeout)
            .open()?;

        tracing::debug!(
            device = %config.device,
            baud = config.baud_rate,
            timeout_ms = config.read_timeout_ms,
            "Opened serial port"
        );

        Ok(Self { port, block })
    }
}

impl Read for SerialTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.port.read(buf) {
                Err(ref e) if self.block && e.kind() == io::ErrorKind::TimedOut => continue,
                result => return result,
            }
        }
    }
}

impl Write for SerialTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}
