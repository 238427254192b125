//! Device metadata snapshot.
//!
//! [`DeviceInfo`] is a lightweight, cloneable description of an enumerated
//! controller. Transports populate what they know; unknown fields remain `None`.
//!
//! # Conventions
//! - `path` is an OS/topology path (opaque string). For the hid backend it is
//!   what gets handed back to `open`.
//! - `connection` is derived from the interface number: Bluetooth HID endpoints
//!   report `-1`, USB endpoints report `>= 0`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the controller is attached. Selects the output/input report framing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionType {
    #[default]
    Usb,
    Bluetooth,
}

impl ConnectionType {
    /// Classify from a hidapi-style interface number.
    pub fn from_interface_number(n: i32) -> Self {
        if n < 0 {
            ConnectionType::Bluetooth
        } else {
            ConnectionType::Usb
        }
    }
}

/// Snapshot of metadata describing a single enumerated controller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// USB Vendor ID (VID).
    pub vid: u16,

    /// USB Product ID (PID).
    pub pid: u16,

    /// Human-readable product name from the driver/firmware.
    pub product_string: Option<String>,

    /// Device serial number supplied by firmware/OS, if present.
    ///
    /// Over Bluetooth this is usually the controller's MAC address.
    pub serial_number: Option<String>,

    /// OS/topological path to the device.
    pub path: String,

    /// HID interface index (platform-reported, `-1` when not applicable).
    pub interface_number: i32,

    pub connection: ConnectionType,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{:04x}:{:04x}] via {:?}",
            self.product_string.as_deref().unwrap_or("Unknown"),
            self.vid,
            self.pid,
            self.connection
        )
    }
}
