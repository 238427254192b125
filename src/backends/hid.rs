//! hidapi transport for the DualSense and DualSense Edge.
//!
//! [`HidTransport`] enumerates matching controllers and opens them as
//! [`HidHandle`]s. A handle:
//! - encodes the full output state into a USB or Bluetooth output report
//! - keeps separate OS handles for writing output and reading input when the
//!   platform allows a second open, so the two directions never block each other
//! - decodes input reports into [`InputState`]
//!
//! This module does **not** cache output state or take the session lock; that
//! is [`Session`](crate::session::Session)'s job.

use crate::config::SessionConfig;
use crate::device::{DeviceHandle, Transport};
use crate::error::{Error, Result};
use crate::input::InputState;
use crate::metadata::{ConnectionType, DeviceInfo};
use crate::output::OutputState;
use crate::report;
use crate::session::Session;
use hidapi::{HidApi, HidDevice};
use parking_lot::Mutex;
use std::ffi::CString;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{debug, trace};

/// Feature report that switches a Bluetooth controller from the reduced
/// input report to the full one. Reading it is enough.
const FEATURE_REPORT_CALIBRATION: u8 = 0x05;
const FEATURE_REPORT_CALIBRATION_SIZE: usize = 41;

/// Upper bound on queued reports discarded per read.
const MAX_DRAINED_REPORTS: usize = 64;

/// Longest wait for a read that shares the output handle. Output pushes queue
/// behind it while the session lock is held, so it must stay finite.
const SHARED_READ_TIMEOUT_MS: i32 = 16;

/// Read timeout actually used by a handle.
///
/// A dedicated reader keeps the configured value, including `-1`. A reader
/// that shares the output handle is clamped to [`SHARED_READ_TIMEOUT_MS`].
fn effective_read_timeout(configured: i32, split_reader: bool) -> i32 {
    if split_reader {
        configured
    } else if configured < 0 {
        SHARED_READ_TIMEOUT_MS
    } else {
        configured.min(SHARED_READ_TIMEOUT_MS)
    }
}

pub type HidSession = Session<HidHandle>;

/// Open the first DualSense found with the default configuration.
pub fn open_default() -> Result<HidSession> {
    open_with(&SessionConfig::default())
}

/// Open a session with an explicit configuration.
///
/// Failure to start the HID API counts as an enumeration failure.
pub fn open_with(config: &SessionConfig) -> Result<HidSession> {
    let transport = HidTransport::new().map_err(|e| {
        debug!(error = %e, "failed to initialize HID API");
        Error::NoDeviceFound
    })?;
    Session::open(&transport, config)
}

pub struct HidTransport {
    api: Mutex<HidApi>,
}

impl HidTransport {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: Mutex::new(HidApi::new()?),
        })
    }
}

fn device_info(info: &hidapi::DeviceInfo) -> DeviceInfo {
    DeviceInfo {
        vid: info.vendor_id(),
        pid: info.product_id(),
        product_string: info.product_string().map(|s| s.to_string()),
        serial_number: info.serial_number().map(|s| s.to_string()),
        path: info.path().to_string_lossy().to_string(),
        interface_number: info.interface_number(),
        connection: ConnectionType::from_interface_number(info.interface_number()),
    }
}

impl Transport for HidTransport {
    type Handle = HidHandle;

    fn enumerate(&self, config: &SessionConfig) -> Result<Vec<DeviceInfo>> {
        let mut api = self.api.lock();
        api.refresh_devices()?;

        let mut found: Vec<DeviceInfo> = Vec::new();
        for info in api.device_list() {
            if !config.accepts(info.vendor_id(), info.product_id()) {
                continue;
            }
            let dev = device_info(info);
            // Some platforms list one entry per top-level collection.
            if found.iter().any(|d| d.path == dev.path) {
                continue;
            }
            debug!(device = %dev, path = %dev.path, "found controller");
            found.push(dev);
            if found.len() >= config.max_devices {
                break;
            }
        }
        Ok(found)
    }

    fn open(&self, info: &DeviceInfo, config: &SessionConfig) -> Result<HidHandle> {
        let api = self.api.lock();
        let path = CString::new(info.path.clone()).map_err(std::io::Error::from)?;

        let writer = api.open_path(&path)?;
        let reader = match api.open_path(&path) {
            Ok(dev) => Some(Mutex::new(dev)),
            Err(e) => {
                debug!(error = %e, "second open refused, input reads share the output handle");
                None
            }
        };

        #[cfg(all(feature = "debug-log", debug_assertions))]
        trace!(
            device = %info,
            serial = info.serial_number.as_deref().unwrap_or(""),
            path = %info.path,
            split_reader = reader.is_some(),
            "opened controller"
        );

        let read_timeout_ms = effective_read_timeout(config.read_timeout_ms, reader.is_some());
        if read_timeout_ms != config.read_timeout_ms {
            debug!(
                configured = config.read_timeout_ms,
                read_timeout_ms, "clamped read timeout on shared handle"
            );
        }

        let handle = HidHandle {
            writer: Mutex::new(writer),
            reader,
            connection: info.connection,
            read_timeout_ms,
            seq: AtomicU8::new(0),
        };

        if info.connection == ConnectionType::Bluetooth {
            handle.enable_full_input_reports();
        }

        Ok(handle)
    }
}

/// Open DualSense handle.
pub struct HidHandle {
    writer: Mutex<HidDevice>,
    reader: Option<Mutex<HidDevice>>,
    connection: ConnectionType,
    read_timeout_ms: i32,
    /// Bluetooth output sequence number, wraps at 16.
    seq: AtomicU8,
}

impl HidHandle {
    pub fn connection(&self) -> ConnectionType {
        self.connection
    }

    fn reader(&self) -> &Mutex<HidDevice> {
        self.reader.as_ref().unwrap_or(&self.writer)
    }

    fn enable_full_input_reports(&self) {
        let mut buf = [0u8; FEATURE_REPORT_CALIBRATION_SIZE];
        buf[0] = FEATURE_REPORT_CALIBRATION;
        if let Err(e) = self.writer.lock().get_feature_report(&mut buf) {
            debug!(error = %e, "calibration feature report failed");
        }
    }
}

impl DeviceHandle for HidHandle {
    fn push_output_state(&self, state: &OutputState) -> Result<()> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) & 0x0F;
        let buf = report::encode_output(state, self.connection, seq);

        #[cfg(all(feature = "debug-log", debug_assertions))]
        trace!(bytes = ?buf, "output report");

        self.writer.lock().write(&buf)?;
        Ok(())
    }

    /// Decode the newest input report.
    ///
    /// Reports the OS queued since the last call are drained without waiting
    /// and only the last one is kept. The configured timeout applies only when
    /// nothing was queued.
    fn read_input_state(&self, out: &mut InputState) -> Result<()> {
        let reader = self.reader().lock();
        let mut latest = [0u8; report::BT_INPUT_REPORT_SIZE];
        let mut scratch = [0u8; report::BT_INPUT_REPORT_SIZE];
        let mut len = 0;

        for _ in 0..MAX_DRAINED_REPORTS {
            let n = reader.read_timeout(&mut scratch, 0)?;
            if n == 0 {
                break;
            }
            latest[..n].copy_from_slice(&scratch[..n]);
            len = n;
        }

        if len == 0 {
            len = reader.read_timeout(&mut latest, self.read_timeout_ms)?;
            if len == 0 {
                return Err(Error::ReadTimeout(self.read_timeout_ms));
            }
        }
        drop(reader);

        report::decode_input(&latest[..len], out)
    }

    fn close(&mut self) {
        trace!(connection = ?self.connection, "releasing HID handles");
    }
}
