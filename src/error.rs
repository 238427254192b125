//! Error types.
//!
//! Only [`Session::open`](crate::session::Session::open) surfaces failures to the
//! caller. Output operations are fire-and-forget; their failures are recorded in
//! [`PushStatus`](crate::session::PushStatus) and logged, never returned.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Enumeration found zero matching controllers. Retry `open` later.
    #[error("no DualSense controller found")]
    NoDeviceFound,

    /// A controller was found but the open handshake failed (usually
    /// permissions or another process holding exclusive access).
    #[error("failed to initialize device context: {0}")]
    ContextInitFailed(#[source] Box<Error>),

    #[error("HID API error: {0}")]
    Hid(#[from] hidapi::HidError),

    #[error("invalid report: {0}")]
    InvalidReport(String),

    #[error("no input report within {0} ms")]
    ReadTimeout(i32),

    #[error("device handle is closed")]
    DeviceClosed,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Tri-state outcome of opening a session. The discriminants are the C-ABI
/// return codes of `ds5_init`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    Success = 0,
    NoDeviceFound = -1,
    ContextInitFailed = -2,
}

impl InitStatus {
    /// Classify the result of [`Session::open`](crate::session::Session::open).
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => InitStatus::Success,
            Err(Error::NoDeviceFound) => InitStatus::NoDeviceFound,
            Err(_) => InitStatus::ContextInitFailed,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}
