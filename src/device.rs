//! Transport seams.
//!
//! A [`Transport`] discovers and opens controllers; the [`DeviceHandle`] it
//! returns moves whole output states and input reports. Everything above this
//! layer (caching, locking, the session lifecycle) is transport-agnostic.

use crate::config::SessionConfig;
use crate::error::Result;
use crate::input::InputState;
use crate::metadata::DeviceInfo;
use crate::output::OutputState;

pub trait Transport {
    type Handle: DeviceHandle;

    /// List matching controllers, at most `config.max_devices`.
    fn enumerate(&self, config: &SessionConfig) -> Result<Vec<DeviceInfo>>;

    /// Open the controller described by `info`.
    fn open(&self, info: &DeviceInfo, config: &SessionConfig) -> Result<Self::Handle>;
}

/// An open controller.
///
/// Handles are shared between the output path (always called under the
/// session lock) and the input path (called without it), so implementations
/// must be `Sync` and keep the two directions independently thread-safe.
pub trait DeviceHandle: Send + Sync {
    /// Send the complete output state. The device has no partial-update mode.
    fn push_output_state(&self, state: &OutputState) -> Result<()>;

    /// Read the newest input report into `out`. Reports queued since the
    /// previous read are discarded, not returned one per call. Must not
    /// wait without bound on a channel shared with output pushes.
    fn read_input_state(&self, out: &mut InputState) -> Result<()>;

    /// Release OS resources. Called once, after the final neutral push.
    fn close(&mut self) {}
}
