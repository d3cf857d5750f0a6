//! Configuration for brain-config
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Serial speed the Brain firmware talks at
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// The only firmware identifier this crate has been verified against
pub const EXPECTED_FIRMWARE: &str = "BRAIN2 3.1.010";

/// Connection configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Serial Configuration
    // -------------------------------------------------------------------------
    /// Serial device path or name (e.g. /dev/ttyUSB0, COM3)
    pub device: String,

    /// Line speed
    pub baud_rate: u32,

    /// Read timeout (milliseconds), 0 blocks until the device answers
    pub read_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Device Configuration
    // -------------------------------------------------------------------------
    /// Firmware identifier the version handshake must return verbatim
    pub expected_firmware: String,

    /// TOML file holding the global and setup field tables
    pub field_table: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: 0,
            expected_firmware: EXPECTED_FIRMWARE.to_string(),
            field_table: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the serial device
    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.config.device = device.into();
        self
    }

    /// Set the line speed
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.config.baud_rate = baud;
        self
    }

    /// Set the read timeout (in milliseconds, 0 = none)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the firmware identifier required at connect time
    pub fn expected_firmware(mut self, firmware: impl Into<String>) -> Self {
        self.config.expected_firmware = firmware.into();
        self
    }

    /// Set the field table file
    pub fn field_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.field_table = Some(path.into());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
