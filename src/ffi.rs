//! Flat C ABI for host engines.
//!
//! Hosts hold no handles: a single process-wide [`HidSession`] slot backs
//! every call. Output calls take a read guard on the slot, so they run
//! concurrently up to the session's own lock, which serializes them. `ds5_init`
//! and `ds5_quit` take the write guard and therefore wait for in-flight calls.
//!
//! Calls made while no session is open do nothing; `ds5_get_input_state`
//! returns `false`.
//!
//! Symbols are exported as `DS5_Init`, `DS5_SetLightbar`, ... so the library
//! can replace an existing `DS5Bridge` native plugin without rebinding.

use crate::backends::hid::{self, HidSession};
use crate::error::InitStatus;
use crate::input::InputState;
use crate::logger;
use crate::output::TriggerSide;
use parking_lot::{const_rwlock, RwLock};
use tracing::{info, warn};

static SESSION: RwLock<Option<HidSession>> = const_rwlock(None);

fn with_session(f: impl FnOnce(&HidSession)) {
    if let Some(session) = SESSION.read().as_ref() {
        f(session);
    }
}

/// Open the first DualSense found. Returns `0` on success, `-1` when no
/// controller is connected, `-2` when one was found but could not be opened.
///
/// Calling this while a session is open closes that session first.
#[export_name = "DS5_Init"]
pub extern "C" fn ds5_init() -> i32 {
    logger::init();

    let mut slot = SESSION.write();
    if let Some(previous) = slot.take() {
        info!("re-initializing, closing previous session");
        previous.close();
    }

    let result = hid::open_default();
    let status = InitStatus::of(&result);
    match result {
        Ok(session) => *slot = Some(session),
        Err(e) => warn!(code = status.code(), error = %e, "ds5_init failed"),
    }
    status.code()
}

/// Reset the controller to neutral and release it.
#[export_name = "DS5_Quit"]
pub extern "C" fn ds5_quit() {
    if let Some(session) = SESSION.write().take() {
        session.close();
    }
}

#[export_name = "DS5_SetLightbar"]
pub extern "C" fn ds5_set_lightbar(r: u8, g: u8, b: u8) {
    with_session(|s| s.set_lightbar(r, g, b));
}

#[export_name = "DS5_SetRumble"]
pub extern "C" fn ds5_set_rumble(left: u8, right: u8) {
    with_session(|s| s.set_rumble(left, right));
}

/// `trigger`: `0` for the left trigger, anything else for the right one.
#[export_name = "DS5_SetTriggerResistance"]
pub extern "C" fn ds5_set_trigger_resistance(trigger: u8, start_pos: u8, force: u8) {
    with_session(|s| s.set_trigger_resistance(TriggerSide::from_index(trigger), start_pos, force));
}

#[export_name = "DS5_SetBothTriggerResistance"]
pub extern "C" fn ds5_set_both_trigger_resistance(
    left_start_pos: u8,
    left_force: u8,
    right_start_pos: u8,
    right_force: u8,
) {
    with_session(|s| {
        s.set_both_trigger_resistance(left_start_pos, left_force, right_start_pos, right_force)
    });
}

#[export_name = "DS5_ClearTriggers"]
pub extern "C" fn ds5_clear_triggers() {
    with_session(|s| s.clear_triggers());
}

#[export_name = "DS5_SetMicLed"]
pub extern "C" fn ds5_set_mic_led(on: bool) {
    with_session(|s| s.set_mic_led(on));
}

#[export_name = "DS5_SetPlayerLeds"]
pub extern "C" fn ds5_set_player_leds(bitmask: u8) {
    with_session(|s| s.set_player_leds(bitmask));
}

/// Number of output pushes that failed since `ds5_init`.
#[export_name = "DS5_GetPushFailures"]
pub extern "C" fn ds5_get_push_failures() -> u64 {
    SESSION
        .read()
        .as_ref()
        .map(|s| s.push_status().failures)
        .unwrap_or(0)
}

/// Read the current input state into `out`.
///
/// # Safety
/// `out` must be null or point to writable memory laid out as [`InputState`].
/// It is only written when `true` is returned.
#[export_name = "DS5_GetInputState"]
pub unsafe extern "C" fn ds5_get_input_state(out: *mut InputState) -> bool {
    if out.is_null() {
        return false;
    }
    let mut state = InputState::default();
    let mut ok = false;
    with_session(|s| ok = s.get_input_state(&mut state));
    if ok {
        // SAFETY: non-null and valid for writes per the contract above.
        unsafe { out.write(state) };
    }
    ok
}
