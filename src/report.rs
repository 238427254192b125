//! DualSense wire codec.
//!
//! Output reports always carry the full [`OutputState`]; the controller has no
//! partial-update mode. Both USB and Bluetooth framings share the same 47-byte
//! common block:
//!
//! | offset   | field                                          |
//! |----------|------------------------------------------------|
//! | 0, 1     | valid flags (everything but "release LEDs")    |
//! | 2, 3     | right / left rumble motor                      |
//! | 8        | mic LED                                        |
//! | 10..=20  | right trigger effect block                     |
//! | 21..=31  | left trigger effect block                      |
//! | 38       | valid flags 2 (lightbar setup + brightness)    |
//! | 41       | lightbar setup                                 |
//! | 42       | player LED brightness                          |
//! | 43       | player LED bitmask, bit 5 = no fade            |
//! | 44..=46  | lightbar red / green / blue                    |
//!
//! Source for the layout: `drivers/hid/hid-playstation.c` in Linux.

use crate::error::{Error, Result};
use crate::input::{buttons, Battery, InputState, Touch, Vector3};
use crate::metadata::ConnectionType;
use crate::output::{LedBrightness, MicLed, OutputState, TriggerEffect};

pub const USB_OUTPUT_REPORT_ID: u8 = 0x02;
pub const USB_OUTPUT_REPORT_SIZE: usize = 48;
pub const BT_OUTPUT_REPORT_ID: u8 = 0x31;
pub const BT_OUTPUT_REPORT_SIZE: usize = 78;
const BT_OUTPUT_TAG: u8 = 0x10;
const BT_CRC_SEED: u8 = 0xA2;

pub const USB_INPUT_REPORT_ID: u8 = 0x01;
pub const USB_INPUT_REPORT_SIZE: usize = 64;
pub const BT_INPUT_REPORT_ID: u8 = 0x31;
pub const BT_INPUT_REPORT_SIZE: usize = 78;

const COMMON_SIZE: usize = 47;
const TRIGGER_BLOCK_SIZE: usize = 11;
const RIGHT_TRIGGER_OFFSET: usize = 10;
const LEFT_TRIGGER_OFFSET: usize = 21;

const VALID_FLAG0: u8 = 0xFF;
const VALID_FLAG1: u8 = 0xF7;
const VALID_FLAG2: u8 = 0x03;
// Lightbar setup byte takes light fade animation codes. Fade-out while lit
// and fade-in when LEDs are disabled, matching the ds5w disable-LEDs switch.
const LIGHT_FADE_IN: u8 = 0x01;
const LIGHT_FADE_OUT: u8 = 0x02;
const PLAYER_LED_MASK: u8 = 0x1F;
const PLAYER_LED_NO_FADE: u8 = 0x20;

const TRIGGER_MODE_OFF: u8 = 0x00;
const TRIGGER_MODE_CONTINUOUS: u8 = 0x01;
const TRIGGER_MODE_SECTION: u8 = 0x02;

/// Encode the full output state for the given connection.
///
/// `seq` is only used for Bluetooth framing, where the controller expects a
/// rolling 4-bit sequence number.
pub fn encode_output(state: &OutputState, connection: ConnectionType, seq: u8) -> Vec<u8> {
    match connection {
        ConnectionType::Usb => {
            let mut buf = vec![0u8; USB_OUTPUT_REPORT_SIZE];
            buf[0] = USB_OUTPUT_REPORT_ID;
            write_common(state, &mut buf[1..1 + COMMON_SIZE]);
            buf
        }
        ConnectionType::Bluetooth => {
            let mut buf = vec![0u8; BT_OUTPUT_REPORT_SIZE];
            buf[0] = BT_OUTPUT_REPORT_ID;
            buf[1] = (seq & 0x0F) << 4;
            buf[2] = BT_OUTPUT_TAG;
            write_common(state, &mut buf[3..3 + COMMON_SIZE]);
            let crc = bt_crc(&buf[..BT_OUTPUT_REPORT_SIZE - 4]);
            buf[BT_OUTPUT_REPORT_SIZE - 4..].copy_from_slice(&crc.to_le_bytes());
            buf
        }
    }
}

fn bt_crc(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&[BT_CRC_SEED]);
    hasher.update(data);
    hasher.finalize()
}

fn write_common(state: &OutputState, out: &mut [u8]) {
    out[0] = VALID_FLAG0;
    out[1] = VALID_FLAG1;
    out[2] = state.right_rumble;
    out[3] = state.left_rumble;

    write_trigger(
        &state.right_trigger_effect,
        &mut out[RIGHT_TRIGGER_OFFSET..RIGHT_TRIGGER_OFFSET + TRIGGER_BLOCK_SIZE],
    );
    write_trigger(
        &state.left_trigger_effect,
        &mut out[LEFT_TRIGGER_OFFSET..LEFT_TRIGGER_OFFSET + TRIGGER_BLOCK_SIZE],
    );

    out[38] = VALID_FLAG2;
    out[42] = match state.player_leds.brightness {
        LedBrightness::High => 0x00,
        LedBrightness::Medium => 0x01,
        LedBrightness::Low => 0x02,
    };

    if state.disable_leds {
        out[8] = 0;
        out[41] = LIGHT_FADE_IN;
        out[43] = PLAYER_LED_NO_FADE;
        return;
    }

    out[8] = match state.microphone_led {
        MicLed::Off => 0x00,
        MicLed::On => 0x01,
        MicLed::Pulse => 0x02,
    };
    out[41] = LIGHT_FADE_OUT;
    out[43] = state.player_leds.bitmask & PLAYER_LED_MASK;
    if !state.player_leds.fade {
        out[43] |= PLAYER_LED_NO_FADE;
    }
    out[44] = state.lightbar.r;
    out[45] = state.lightbar.g;
    out[46] = state.lightbar.b;
}

/// The block is zero-filled before the effect is written, so switching to
/// `NoResistance` clears every leftover parameter byte.
fn write_trigger(effect: &TriggerEffect, block: &mut [u8]) {
    block.fill(0);
    match *effect {
        TriggerEffect::NoResistance => block[0] = TRIGGER_MODE_OFF,
        TriggerEffect::ContinuousResistance {
            start_position,
            force,
        } => {
            block[0] = TRIGGER_MODE_CONTINUOUS;
            block[1] = start_position;
            block[2] = force;
        }
        TriggerEffect::SectionResistance {
            start_position,
            end_position,
        } => {
            block[0] = TRIGGER_MODE_SECTION;
            block[1] = start_position;
            block[2] = end_position;
        }
    }
}

/// Decode a raw input report (report ID included) into `out`.
///
/// The framing is taken from the report ID, so the same function serves USB
/// and Bluetooth handles.
pub fn decode_input(buf: &[u8], out: &mut InputState) -> Result<()> {
    let payload = match buf.first() {
        Some(&USB_INPUT_REPORT_ID) if buf.len() >= USB_INPUT_REPORT_SIZE => &buf[1..],
        Some(&BT_INPUT_REPORT_ID) if buf.len() >= BT_INPUT_REPORT_SIZE => &buf[2..],
        Some(id) => {
            return Err(Error::InvalidReport(format!(
                "unexpected input report id=0x{id:02x} len={}",
                buf.len()
            )))
        }
        None => return Err(Error::InvalidReport("empty input report".into())),
    };
    decode_common(payload, out);
    Ok(())
}

fn decode_common(d: &[u8], out: &mut InputState) {
    out.left_stick_x = center_x(d[0]);
    out.left_stick_y = center_y(d[1]);
    out.right_stick_x = center_x(d[2]);
    out.right_stick_y = center_y(d[3]);
    out.left_trigger = d[4];
    out.right_trigger = d[5];

    out.buttons_and_dpad = (d[7] & buttons::FACE_MASK) | hat_to_dpad(d[7] & 0x0F);
    out.buttons_a = d[8];
    out.buttons_b = d[9];

    out.gyroscope = vector3(&d[15..21]);
    out.accelerometer = vector3(&d[21..27]);

    out.touch1 = touch(&d[32..36]);
    out.touch2 = touch(&d[36..40]);

    out.right_trigger_feedback = d[41];
    out.left_trigger_feedback = d[42];

    let status = d[52];
    out.battery = Battery {
        level: (status & 0x0F).min(10),
        charging: status >> 4 == 0x1,
        full: status >> 4 == 0x2,
    };
    out.headphone_connected = d[53] & 0x01 != 0;
}

#[inline]
fn center_x(raw: u8) -> i8 {
    (raw as i16 - 128) as i8
}

#[inline]
fn center_y(raw: u8) -> i8 {
    (127 - raw as i16) as i8
}

fn hat_to_dpad(hat: u8) -> u8 {
    use buttons::{DPAD_DOWN, DPAD_LEFT, DPAD_RIGHT, DPAD_UP};
    match hat {
        0 => DPAD_UP,
        1 => DPAD_UP | DPAD_RIGHT,
        2 => DPAD_RIGHT,
        3 => DPAD_DOWN | DPAD_RIGHT,
        4 => DPAD_DOWN,
        5 => DPAD_DOWN | DPAD_LEFT,
        6 => DPAD_LEFT,
        7 => DPAD_UP | DPAD_LEFT,
        _ => 0,
    }
}

fn vector3(b: &[u8]) -> Vector3 {
    Vector3 {
        x: i16::from_le_bytes([b[0], b[1]]),
        y: i16::from_le_bytes([b[2], b[3]]),
        z: i16::from_le_bytes([b[4], b[5]]),
    }
}

/// Byte 0 bit 7 set means no contact.
fn touch(b: &[u8]) -> Touch {
    if b[0] & 0x80 != 0 {
        return Touch::default();
    }
    Touch {
        x: b[1] as u32 | ((b[2] & 0x0F) as u32) << 8,
        y: (b[2] >> 4) as u32 | (b[3] as u32) << 4,
    }
}
