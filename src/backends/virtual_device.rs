//! In-memory transport.
//!
//! [`VirtualDevice`] records every output state pushed to it and serves input
//! states queued with [`VirtualDevice::feed`]. Clones share the same
//! recording, so a test can keep a clone and inspect what a session sent after
//! the session is gone. Open, enumerate and push failures can be injected, and
//! pushes can be held at a gate to keep the session lock taken.

use crate::config::{SessionConfig, DUALSENSE_PID, SONY_VID};
use crate::device::{DeviceHandle, Transport};
use crate::error::{Error, Result};
use crate::input::InputState;
use crate::metadata::{ConnectionType, DeviceInfo};
use crate::output::OutputState;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Shared {
    pushed: Mutex<Vec<OutputState>>,
    inputs: Mutex<VecDeque<InputState>>,
    fail_push: AtomicBool,
    closed: AtomicBool,
    gate_closed: Mutex<bool>,
    gate: Condvar,
    held_pushes: AtomicUsize,
}

#[derive(Clone)]
pub struct VirtualDevice {
    info: DeviceInfo,
    shared: Arc<Shared>,
}

impl VirtualDevice {
    pub fn new(path: &str) -> Self {
        Self {
            info: DeviceInfo {
                vid: SONY_VID,
                pid: DUALSENSE_PID,
                product_string: Some("Virtual DualSense".into()),
                serial_number: None,
                path: path.to_string(),
                interface_number: 0,
                connection: ConnectionType::Usb,
            },
            shared: Arc::default(),
        }
    }

    pub fn with_connection(mut self, connection: ConnectionType) -> Self {
        self.info.connection = connection;
        self.info.interface_number = match connection {
            ConnectionType::Usb => 0,
            ConnectionType::Bluetooth => -1,
        };
        self
    }

    pub fn with_ids(mut self, vid: u16, pid: u16) -> Self {
        self.info.vid = vid;
        self.info.pid = pid;
        self
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Queue an input state. A read returns the newest queued state and
    /// discards the older ones.
    pub fn feed(&self, state: InputState) {
        self.shared.inputs.lock().push_back(state);
    }

    /// Every state pushed so far, oldest first.
    pub fn pushed(&self) -> Vec<OutputState> {
        self.shared.pushed.lock().clone()
    }

    pub fn last_pushed(&self) -> Option<OutputState> {
        self.shared.pushed.lock().last().copied()
    }

    pub fn push_count(&self) -> usize {
        self.shared.pushed.lock().len()
    }

    /// Make subsequent pushes fail (and not be recorded) until cleared.
    pub fn set_push_failure(&self, fail: bool) {
        self.shared.fail_push.store(fail, Ordering::SeqCst);
    }

    /// Hold every push at the gate until [`open_push_gate`](Self::open_push_gate).
    pub fn close_push_gate(&self) {
        *self.shared.gate_closed.lock() = true;
    }

    pub fn open_push_gate(&self) {
        *self.shared.gate_closed.lock() = false;
        self.shared.gate.notify_all();
    }

    /// Pushes currently waiting at the gate.
    pub fn held_pushes(&self) -> usize {
        self.shared.held_pushes.load(Ordering::SeqCst)
    }

    fn wait_at_gate(&self) {
        let mut closed = self.shared.gate_closed.lock();
        if !*closed {
            return;
        }
        self.shared.held_pushes.fetch_add(1, Ordering::SeqCst);
        while *closed {
            self.shared.gate.wait(&mut closed);
        }
        self.shared.held_pushes.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }
}

impl DeviceHandle for VirtualDevice {
    fn push_output_state(&self, state: &OutputState) -> Result<()> {
        if self.is_closed() {
            return Err(Error::DeviceClosed);
        }
        self.wait_at_gate();
        if self.shared.fail_push.load(Ordering::SeqCst) {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "injected push failure",
            )));
        }
        self.shared.pushed.lock().push(*state);
        Ok(())
    }

    fn read_input_state(&self, out: &mut InputState) -> Result<()> {
        if self.is_closed() {
            return Err(Error::DeviceClosed);
        }
        let next = {
            let mut inputs = self.shared.inputs.lock();
            let newest = inputs.pop_back();
            inputs.clear();
            newest
        };
        match next {
            Some(state) => {
                *out = state;
                Ok(())
            }
            None => Err(Error::ReadTimeout(0)),
        }
    }

    fn close(&mut self) {
        self.shared.closed.store(true, Ordering::SeqCst);
    }
}

/// Transport over a fixed set of [`VirtualDevice`]s.
#[derive(Default)]
pub struct VirtualTransport {
    devices: Vec<VirtualDevice>,
    fail_enumerate: bool,
    fail_open: bool,
}

impl VirtualTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(device: VirtualDevice) -> Self {
        let mut transport = Self::new();
        transport.add_device(device);
        transport
    }

    pub fn add_device(&mut self, device: VirtualDevice) {
        self.devices.push(device);
    }

    pub fn set_fail_enumerate(&mut self, fail: bool) {
        self.fail_enumerate = fail;
    }

    /// Simulate a device that is present but cannot be opened.
    pub fn set_fail_open(&mut self, fail: bool) {
        self.fail_open = fail;
    }
}

impl Transport for VirtualTransport {
    type Handle = VirtualDevice;

    fn enumerate(&self, config: &SessionConfig) -> Result<Vec<DeviceInfo>> {
        if self.fail_enumerate {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::Other,
                "injected enumeration failure",
            )));
        }
        Ok(self
            .devices
            .iter()
            .filter(|d| config.accepts(d.info.vid, d.info.pid))
            .take(config.max_devices)
            .map(|d| d.info.clone())
            .collect())
    }

    fn open(&self, info: &DeviceInfo, _config: &SessionConfig) -> Result<VirtualDevice> {
        if self.fail_open {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "injected open failure",
            )));
        }
        self.devices
            .iter()
            .find(|d| d.info.path == info.path)
            .cloned()
            .ok_or(Error::NoDeviceFound)
    }
}
