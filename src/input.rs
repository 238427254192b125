//! Input state read back from the controller.
//!
//! [`InputState`] is `#[repr(C)]` so it can be filled directly through the C
//! ABI into a host-owned struct of the same layout.
//!
//! ## Value conventions
//! - Sticks are centered signed values, `-128..=127`; Y is positive up.
//! - Triggers are raw travel, `0..=255`.
//! - `buttons_and_dpad` keeps the face buttons in the high nibble and the d-pad
//!   as a bitmask in the low nibble (see [`buttons`]), not the raw hat value.

use serde::Serialize;

/// Button bits for the three button bytes of [`InputState`].
pub mod buttons {
    // buttons_and_dpad
    pub const DPAD_LEFT: u8 = 0x01;
    pub const DPAD_DOWN: u8 = 0x02;
    pub const DPAD_RIGHT: u8 = 0x04;
    pub const DPAD_UP: u8 = 0x08;
    pub const SQUARE: u8 = 0x10;
    pub const CROSS: u8 = 0x20;
    pub const CIRCLE: u8 = 0x40;
    pub const TRIANGLE: u8 = 0x80;
    pub const DPAD_MASK: u8 = 0x0F;
    pub const FACE_MASK: u8 = 0xF0;

    // buttons_a
    pub const LEFT_BUMPER: u8 = 0x01;
    pub const RIGHT_BUMPER: u8 = 0x02;
    pub const LEFT_TRIGGER: u8 = 0x04;
    pub const RIGHT_TRIGGER: u8 = 0x08;
    pub const SELECT: u8 = 0x10;
    pub const MENU: u8 = 0x20;
    pub const LEFT_STICK: u8 = 0x40;
    pub const RIGHT_STICK: u8 = 0x80;

    // buttons_b
    pub const PLAYSTATION_LOGO: u8 = 0x01;
    pub const PAD_BUTTON: u8 = 0x02;
    pub const MIC_BUTTON: u8 = 0x04;
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Vector3 {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Touchpad contact position. Both axes are 12-bit; `0,0` when untouched.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Touch {
    pub x: u32,
    pub y: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Battery {
    pub charging: bool,
    pub full: bool,
    /// `0..=10`.
    pub level: u8,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InputState {
    pub left_stick_x: i8,
    pub left_stick_y: i8,
    pub right_stick_x: i8,
    pub right_stick_y: i8,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub buttons_and_dpad: u8,
    pub buttons_a: u8,
    pub buttons_b: u8,
    pub accelerometer: Vector3,
    pub gyroscope: Vector3,
    pub touch1: Touch,
    pub touch2: Touch,
    pub battery: Battery,
    pub headphone_connected: bool,
    pub left_trigger_feedback: u8,
    pub right_trigger_feedback: u8,
}

impl InputState {
    #[inline]
    pub fn pressed(&self, mask: u8) -> bool {
        self.buttons_and_dpad & mask != 0
    }

    #[inline]
    pub fn pressed_a(&self, mask: u8) -> bool {
        self.buttons_a & mask != 0
    }

    #[inline]
    pub fn pressed_b(&self, mask: u8) -> bool {
        self.buttons_b & mask != 0
    }
}
