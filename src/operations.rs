//! Per-field output operations.
//!
//! Each call touches only the fields it names and leaves the rest of the cached
//! state as the previous operations left it, then the whole state goes to the
//! device. None of them report failure; see [`Session::push_status`].

use crate::device::DeviceHandle;
use crate::output::{Color, MicLed, TriggerEffect, TriggerSide};
use crate::session::Session;

impl<H: DeviceHandle> Session<H> {
    pub fn set_lightbar(&self, r: u8, g: u8, b: u8) {
        self.update("set_lightbar", |s| s.lightbar = Color::new(r, g, b));
    }

    pub fn set_rumble(&self, left: u8, right: u8) {
        self.update("set_rumble", |s| {
            s.left_rumble = left;
            s.right_rumble = right;
        });
    }

    /// Continuous resistance on one trigger. The other trigger keeps its effect.
    pub fn set_trigger_resistance(&self, side: TriggerSide, start_position: u8, force: u8) {
        self.update("set_trigger_resistance", |s| {
            *s.trigger_effect_mut(side) = TriggerEffect::continuous(start_position, force);
        });
    }

    /// Continuous resistance on both triggers in a single locked update, so no
    /// other caller can observe one trigger changed and the other stale.
    pub fn set_both_trigger_resistance(
        &self,
        left_start: u8,
        left_force: u8,
        right_start: u8,
        right_force: u8,
    ) {
        self.update("set_both_trigger_resistance", |s| {
            s.left_trigger_effect = TriggerEffect::continuous(left_start, left_force);
            s.right_trigger_effect = TriggerEffect::continuous(right_start, right_force);
        });
    }

    /// Any [`TriggerEffect`] on one trigger.
    pub fn set_trigger_effect(&self, side: TriggerSide, effect: TriggerEffect) {
        self.update("set_trigger_effect", |s| *s.trigger_effect_mut(side) = effect);
    }

    /// Both triggers back to no resistance. The encoder zeroes the effect
    /// parameter bytes along with the mode.
    pub fn clear_triggers(&self) {
        self.update("clear_triggers", |s| {
            s.left_trigger_effect = TriggerEffect::NoResistance;
            s.right_trigger_effect = TriggerEffect::NoResistance;
        });
    }

    pub fn set_mic_led(&self, on: bool) {
        self.update("set_mic_led", |s| s.microphone_led = MicLed::from(on));
    }

    /// Light the player indicators in `bitmask`.
    ///
    /// Fixed policy: every call also forces fade on and brightness to medium,
    /// whatever they were before. Neither is caller-controlled.
    pub fn set_player_leds(&self, bitmask: u8) {
        self.update("set_player_leds", |s| s.player_leds.light(bitmask));
    }
}
