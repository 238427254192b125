//! Output state: everything the controller should currently be doing.
//!
//! The device protocol only accepts whole-state output reports, so
//! [`OutputState`] carries every field of a report. It is a passive value;
//! merging partial updates into it is the job of
//! [`OutputStateCache`](crate::cache::OutputStateCache).

use serde::{Deserialize, Serialize};

/// Player indicator LED bits, left to right.
pub mod player_led {
    pub const LEFT: u8 = 0x01;
    pub const MIDDLE_LEFT: u8 = 0x02;
    pub const MIDDLE: u8 = 0x04;
    pub const MIDDLE_RIGHT: u8 = 0x08;
    pub const RIGHT: u8 = 0x10;
}

/// Microphone mute LED.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MicLed {
    #[default]
    Off,
    On,
    Pulse,
}

impl From<bool> for MicLed {
    fn from(on: bool) -> Self {
        if on {
            MicLed::On
        } else {
            MicLed::Off
        }
    }
}

/// Player indicator brightness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedBrightness {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerLeds {
    /// Lit segments, see [`player_led`].
    pub bitmask: u8,
    /// Fade in when the bitmask changes.
    pub fade: bool,
    pub brightness: LedBrightness,
}

impl PlayerLeds {
    /// Light the segments in `bitmask` with the fixed fade and brightness
    /// policy: fade on, medium brightness, whatever was set before.
    pub fn light(&mut self, bitmask: u8) {
        self.bitmask = bitmask;
        self.fade = true;
        self.brightness = LedBrightness::Medium;
    }
}

/// Lightbar color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Adaptive trigger resistance profile.
///
/// Positions and forces span the full trigger travel, `0..=255`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TriggerEffect {
    /// Trigger moves freely.
    #[default]
    NoResistance,
    /// Constant resistance from `start_position` to the end of travel.
    ContinuousResistance { start_position: u8, force: u8 },
    /// Resistance only between `start_position` and `end_position`.
    SectionResistance { start_position: u8, end_position: u8 },
}

impl TriggerEffect {
    pub const fn continuous(start_position: u8, force: u8) -> Self {
        TriggerEffect::ContinuousResistance {
            start_position,
            force,
        }
    }
}

/// Which adaptive trigger an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerSide {
    Left,
    Right,
}

impl TriggerSide {
    /// Host selector: `0` is the left trigger, any other value the right one.
    pub fn from_index(index: u8) -> Self {
        if index == 0 {
            TriggerSide::Left
        } else {
            TriggerSide::Right
        }
    }
}

/// Full set of fields sent in every output report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputState {
    pub left_rumble: u8,
    pub right_rumble: u8,
    pub microphone_led: MicLed,
    /// Suppress all LEDs regardless of the other LED fields.
    pub disable_leds: bool,
    pub player_leds: PlayerLeds,
    pub lightbar: Color,
    pub left_trigger_effect: TriggerEffect,
    pub right_trigger_effect: TriggerEffect,
}

impl OutputState {
    /// Neutral state: lightbar black, rumble off, triggers free, mic and
    /// player LEDs off (player brightness medium, no fade).
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn trigger_effect(&self, side: TriggerSide) -> TriggerEffect {
        match side {
            TriggerSide::Left => self.left_trigger_effect,
            TriggerSide::Right => self.right_trigger_effect,
        }
    }

    pub fn trigger_effect_mut(&mut self, side: TriggerSide) -> &mut TriggerEffect {
        match side {
            TriggerSide::Left => &mut self.left_trigger_effect,
            TriggerSide::Right => &mut self.right_trigger_effect,
        }
    }

    /// True when nothing on the controller is active.
    pub fn is_neutral(&self) -> bool {
        self.left_rumble == 0
            && self.right_rumble == 0
            && self.microphone_led == MicLed::Off
            && self.player_leds.bitmask == 0
            && self.lightbar == Color::BLACK
            && self.left_trigger_effect == TriggerEffect::NoResistance
            && self.right_trigger_effect == TriggerEffect::NoResistance
    }
}
