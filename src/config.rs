//! Session configuration.
//!
//! Nothing here is required: [`SessionConfig::default`] targets any wired or
//! wireless DualSense and is what the C ABI uses. Hosts that want to narrow
//! discovery can deserialize a config from TOML or JSON.
//!
//! ```toml
//! vendor_id = 0x054C
//! product_ids = [0x0CE6]
//! max_devices = 1
//! read_timeout_ms = 16
//! prefer_usb = true
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sony Interactive Entertainment.
pub const SONY_VID: u16 = 0x054C;
pub const DUALSENSE_PID: u16 = 0x0CE6;
pub const DUALSENSE_EDGE_PID: u16 = 0x0DF2;

/// Discovery and I/O settings for a [`Session`](crate::session::Session).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// USB vendor ID to match during enumeration.
    pub vendor_id: u16,

    /// Accepted product IDs. An empty list accepts any product from `vendor_id`.
    pub product_ids: Vec<u16>,

    /// Upper bound on enumerated devices. Only the selected one is opened.
    pub max_devices: usize,

    /// Input read timeout in milliseconds, used only when no report is
    /// already queued. `0` polls without blocking, `-1` blocks until a report
    /// arrives. Handles that read through the output channel cap it.
    pub read_timeout_ms: i32,

    /// Prefer a USB-attached controller over Bluetooth when several are found.
    pub prefer_usb: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            vendor_id: SONY_VID,
            product_ids: vec![DUALSENSE_PID, DUALSENSE_EDGE_PID],
            max_devices: 4,
            read_timeout_ms: 8,
            prefer_usb: false,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()
    }

    /// Load from disk. Files ending in `.json` are read as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    /// Whether a VID/PID pair passes the discovery filter.
    pub fn accepts(&self, vid: u16, pid: u16) -> bool {
        vid == self.vendor_id && (self.product_ids.is_empty() || self.product_ids.contains(&pid))
    }

    fn validate(self) -> Result<Self> {
        if self.max_devices == 0 {
            return Err(Error::Config("max_devices must be at least 1".into()));
        }
        if self.read_timeout_ms < -1 {
            return Err(Error::Config(format!(
                "read_timeout_ms must be -1 or greater, got {}",
                self.read_timeout_ms
            )));
        }
        Ok(self)
    }
}
