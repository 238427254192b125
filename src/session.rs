//! Device session lifecycle.
//!
//! A [`Session`] owns the open controller, the cached output state, and the
//! single lock that guards both. Holding a `Session` is the only way to issue
//! output operations, so there is no partially-initialized window in which a
//! push could run unlocked.
//!
//! # Lock discipline
//! - Every output operation runs acquire → mutate cached fields → push the
//!   whole cache → release. Operations are totally ordered and each one is
//!   observed as a unit, including two-field updates.
//! - [`Session::get_input_state`] does not take the lock. Input and output are
//!   independent hardware paths; the handle keeps each direction thread-safe.
//! - Teardown (explicit [`Session::close`] or drop) resets the cache to
//!   neutral and pushes it under the lock before the handle is released.

use crate::cache::OutputStateCache;
use crate::config::SessionConfig;
use crate::device::{DeviceHandle, Transport};
use crate::error::{Error, Result};
use crate::input::InputState;
use crate::metadata::{ConnectionType, DeviceInfo};
use crate::output::OutputState;
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

/// Outcome counters for output pushes.
///
/// Output operations are fire-and-forget; this is how a caller that wants
/// stronger guarantees can find out whether the device is accepting reports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PushStatus {
    /// Pushes attempted, successful or not.
    pub pushes: u64,
    pub failures: u64,
    /// Message of the most recent failure, kept after recovery.
    pub last_error: Option<String>,
    failing: bool,
}

impl PushStatus {
    /// Whether the most recent push failed.
    pub fn is_failing(&self) -> bool {
        self.failing
    }

    fn record(&mut self, op: &'static str, result: Result<()>) {
        self.pushes += 1;
        match result {
            Ok(()) => {
                if self.failing {
                    info!(op, "output pushes recovered");
                }
                self.failing = false;
                trace!(op, "pushed output state");
            }
            Err(e) => {
                self.failures += 1;
                if self.failing {
                    debug!(op, error = %e, "output push failed");
                } else {
                    warn!(op, error = %e, "output push failed");
                }
                self.failing = true;
                self.last_error = Some(e.to_string());
            }
        }
    }
}

/// Everything the session lock protects.
struct Guarded {
    cache: OutputStateCache,
    status: PushStatus,
}

pub struct Session<H: DeviceHandle> {
    device: H,
    info: DeviceInfo,
    output: Mutex<Guarded>,
    closed: bool,
}

impl<H: DeviceHandle> Session<H> {
    /// Discover controllers, open the selected one, and initialize the cache.
    ///
    /// Fails with [`Error::NoDeviceFound`] when enumeration fails or finds
    /// nothing, and with [`Error::ContextInitFailed`] when the open handshake
    /// fails. The cache starts at the neutral defaults; nothing is pushed
    /// until the first output operation.
    pub fn open<T>(transport: &T, config: &SessionConfig) -> Result<Self>
    where
        T: Transport<Handle = H>,
    {
        let devices = match transport.enumerate(config) {
            Ok(devices) => devices,
            Err(e) => {
                warn!(error = %e, "controller enumeration failed");
                return Err(Error::NoDeviceFound);
            }
        };
        debug!(count = devices.len(), "enumerated controllers");

        let info = select_device(&devices, config)
            .ok_or(Error::NoDeviceFound)?
            .clone();

        let device = transport.open(&info, config).map_err(|e| {
            warn!(device = %info, error = %e, "failed to open controller");
            Error::ContextInitFailed(Box::new(e))
        })?;

        let mut cache = OutputStateCache::new();
        cache.ensure_default_initialized();

        info!(device = %info, "session opened");
        Ok(Self {
            device,
            info,
            output: Mutex::new(Guarded {
                cache,
                status: PushStatus::default(),
            }),
            closed: false,
        })
    }

    /// Metadata of the opened controller.
    pub fn device_info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Copy of the cached output state, taken under the lock.
    pub fn output_state(&self) -> OutputState {
        *self.output.lock().cache.state()
    }

    pub fn push_status(&self) -> PushStatus {
        self.output.lock().status.clone()
    }

    /// Read the controller's current input report into `out`.
    ///
    /// Returns `false` on any failure (no report within the read timeout,
    /// transport error, malformed report); `out` is left untouched then.
    /// This path bypasses the session lock.
    pub fn get_input_state(&self, out: &mut InputState) -> bool {
        match self.device.read_input_state(out) {
            Ok(()) => true,
            Err(e) => {
                trace!(error = %e, "input read failed");
                false
            }
        }
    }

    /// Reset the controller to neutral and release it.
    pub fn close(mut self) {
        self.teardown();
    }

    /// Acquire the lock, apply `mutate` to the cached state, push the whole
    /// state, release. Push failures are recorded, never returned.
    pub(crate) fn update(&self, op: &'static str, mutate: impl FnOnce(&mut OutputState)) {
        let mut guard = self.output.lock();
        let Guarded { cache, status } = &mut *guard;
        mutate(cache.ensure_default_initialized());
        let result = self.device.push_output_state(cache.state());
        status.record(op, result);
    }

    fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        {
            let mut guard = self.output.lock();
            let Guarded { cache, status } = &mut *guard;
            let result = self.device.push_output_state(cache.reset_to_neutral());
            status.record("close", result);
        }

        self.device.close();
        info!(device = %self.info, "session closed");
    }
}

impl<H: DeviceHandle> Drop for Session<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// First enumerated device, or the first USB one when `prefer_usb` is set.
fn select_device<'a>(devices: &'a [DeviceInfo], config: &SessionConfig) -> Option<&'a DeviceInfo> {
    if config.prefer_usb {
        if let Some(usb) = devices
            .iter()
            .find(|d| d.connection == ConnectionType::Usb)
        {
            return Some(usb);
        }
    }
    devices.first()
}
