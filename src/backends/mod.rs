//! Transport backends for `ds5bridge`.
//!
//! Implementations of [`Transport`](crate::device::Transport) and
//! [`DeviceHandle`](crate::device::DeviceHandle).
//!
//! # Feature flags
//! - **`hid`**: enables the hidapi DualSense backend (default).
//!
//! The virtual backend is always available; it needs no hardware and is what
//! the test suite drives sessions through.

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;

pub mod virtual_device;
