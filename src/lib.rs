//! ds5bridge: output-state cache and host bridge for the DualSense controller.
//!
//! The controller only accepts whole-state output reports. A [`Session`] keeps
//! the last-intended [`OutputState`] so callers can change one thing at a time
//! (lightbar, rumble, adaptive triggers, LEDs) from any thread, and every change
//! is merged into the cache and flushed as a complete report under one lock.
//!
//! ```no_run
//! use ds5bridge::backends::hid;
//! use ds5bridge::TriggerSide;
//!
//! let session = hid::open_default().expect("open controller");
//! session.set_lightbar(255, 0, 255);
//! session.set_trigger_resistance(TriggerSide::Right, 40, 180);
//! session.set_rumble(0, 64); // lightbar and trigger are kept
//! session.close();           // back to neutral before release
//! ```

pub mod backends;
pub mod cache;
pub mod config;
pub mod device;
pub mod error;
pub mod input;
pub mod logger;
pub mod metadata;
mod operations;
pub mod output;
pub mod report;
pub mod session;

#[cfg(feature = "ffi")]
#[cfg_attr(docsrs, doc(cfg(feature = "ffi")))]
pub mod ffi;

pub use config::SessionConfig;
pub use device::{DeviceHandle, Transport};
pub use error::{Error, InitStatus, Result};
pub use input::InputState;
pub use metadata::{ConnectionType, DeviceInfo};
pub use output::{Color, LedBrightness, MicLed, OutputState, PlayerLeds, TriggerEffect, TriggerSide};
pub use session::{PushStatus, Session};
