//! Session behavior driven through the virtual backend.
//!
//! Covers open/close lifecycle, per-field merging, the fixed player-LED
//! policy, neutral teardown, input pass-through, and push failure accounting.

use ds5bridge::backends::virtual_device::{VirtualDevice, VirtualTransport};
use ds5bridge::{
    Color, ConnectionType, Error, InitStatus, InputState, LedBrightness, MicLed, OutputState,
    Session, SessionConfig, TriggerEffect, TriggerSide,
};
use proptest::prelude::*;

fn open() -> (Session<VirtualDevice>, VirtualDevice) {
    let device = VirtualDevice::new("virtual:0");
    let transport = VirtualTransport::with_device(device.clone());
    let session = Session::open(&transport, &SessionConfig::default()).expect("open session");
    (session, device)
}

// ---------------------------------------------------------------------------
// Open
// ---------------------------------------------------------------------------

#[test]
fn open_without_devices_is_no_device_found() {
    let transport = VirtualTransport::new();
    let result = Session::open(&transport, &SessionConfig::default());
    assert!(matches!(result, Err(Error::NoDeviceFound)));
    assert_eq!(InitStatus::of(&result).code(), -1);
}

#[test]
fn enumeration_failure_is_no_device_found() {
    let mut transport = VirtualTransport::with_device(VirtualDevice::new("virtual:0"));
    transport.set_fail_enumerate(true);
    let result = Session::open(&transport, &SessionConfig::default());
    assert!(matches!(result, Err(Error::NoDeviceFound)));
}

#[test]
fn open_failure_is_context_init_failed() {
    let mut transport = VirtualTransport::with_device(VirtualDevice::new("virtual:0"));
    transport.set_fail_open(true);
    let result = Session::open(&transport, &SessionConfig::default());
    assert!(matches!(result, Err(Error::ContextInitFailed(_))));
    assert_eq!(InitStatus::of(&result), InitStatus::ContextInitFailed);
}

#[test]
fn non_matching_devices_are_ignored() {
    let transport =
        VirtualTransport::with_device(VirtualDevice::new("pad").with_ids(0x045e, 0x028e));
    let result = Session::open(&transport, &SessionConfig::default());
    assert!(matches!(result, Err(Error::NoDeviceFound)));
}

#[test]
fn opens_first_device_found() {
    let mut transport = VirtualTransport::new();
    transport.add_device(VirtualDevice::new("first").with_connection(ConnectionType::Bluetooth));
    transport.add_device(VirtualDevice::new("second"));
    let session = Session::open(&transport, &SessionConfig::default()).unwrap();
    assert_eq!(session.device_info().path, "first");
    assert_eq!(session.device_info().connection, ConnectionType::Bluetooth);
}

#[test]
fn open_initializes_cache_without_pushing() {
    let (session, device) = open();
    assert_eq!(session.output_state(), OutputState::neutral());
    assert_eq!(device.push_count(), 0);
}

// ---------------------------------------------------------------------------
// Output operations
// ---------------------------------------------------------------------------

#[test]
fn every_operation_pushes_the_full_state() {
    let (session, device) = open();
    session.set_lightbar(10, 20, 30);
    session.set_rumble(5, 6);

    let pushed = device.pushed();
    assert_eq!(pushed.len(), 2);
    assert_eq!(pushed[0].lightbar, Color::new(10, 20, 30));
    assert_eq!(pushed[1].lightbar, Color::new(10, 20, 30));
    assert_eq!((pushed[1].left_rumble, pushed[1].right_rumble), (5, 6));
    assert_eq!(pushed[1], session.output_state());
}

#[test]
fn rumble_keeps_lightbar() {
    let (session, _device) = open();
    session.set_lightbar(10, 20, 30);
    session.set_rumble(5, 6);
    assert_eq!(session.output_state().lightbar, Color::new(10, 20, 30));
}

#[test]
fn single_trigger_leaves_other_side_untouched() {
    let (session, _device) = open();
    session.set_trigger_resistance(TriggerSide::Left, 40, 200);
    session.set_trigger_resistance(TriggerSide::Right, 10, 50);
    session.set_trigger_resistance(TriggerSide::Left, 1, 2);

    let state = session.output_state();
    assert_eq!(state.left_trigger_effect, TriggerEffect::continuous(1, 2));
    assert_eq!(state.right_trigger_effect, TriggerEffect::continuous(10, 50));
}

#[test]
fn both_triggers_pushed_in_one_report() {
    let (session, device) = open();
    session.set_both_trigger_resistance(1, 2, 3, 4);

    let pushed = device.pushed();
    assert_eq!(pushed.len(), 1);
    assert_eq!(pushed[0].left_trigger_effect, TriggerEffect::continuous(1, 2));
    assert_eq!(pushed[0].right_trigger_effect, TriggerEffect::continuous(3, 4));
}

#[test]
fn clear_triggers_is_idempotent() {
    let (session, _device) = open();
    session.set_lightbar(9, 9, 9);
    session.set_both_trigger_resistance(1, 2, 3, 4);

    session.clear_triggers();
    let once = session.output_state();
    session.clear_triggers();
    let twice = session.output_state();

    assert_eq!(once, twice);
    assert_eq!(once.left_trigger_effect, TriggerEffect::NoResistance);
    assert_eq!(once.right_trigger_effect, TriggerEffect::NoResistance);
    assert_eq!(once.lightbar, Color::new(9, 9, 9));
}

#[test]
fn mic_led_maps_bool() {
    let (session, _device) = open();
    session.set_mic_led(true);
    assert_eq!(session.output_state().microphone_led, MicLed::On);
    session.set_mic_led(false);
    assert_eq!(session.output_state().microphone_led, MicLed::Off);
}

#[test]
fn player_leds_force_fade_and_medium_brightness() {
    let (session, _device) = open();
    for mask in [0u8, 1, 0b0101, 15] {
        session.set_player_leds(mask);
        let leds = session.output_state().player_leds;
        assert_eq!(leds.bitmask, mask);
        assert!(leds.fade);
        assert_eq!(leds.brightness, LedBrightness::Medium);
    }
}

#[test]
fn generic_trigger_effect() {
    let (session, _device) = open();
    let effect = TriggerEffect::SectionResistance {
        start_position: 30,
        end_position: 120,
    };
    session.set_trigger_effect(TriggerSide::Right, effect);
    assert_eq!(session.output_state().right_trigger_effect, effect);
    assert_eq!(
        session.output_state().left_trigger_effect,
        TriggerEffect::NoResistance
    );
}

// ---------------------------------------------------------------------------
// Teardown
// ---------------------------------------------------------------------------

fn dirty(session: &Session<VirtualDevice>) {
    session.set_lightbar(255, 0, 0);
    session.set_rumble(200, 100);
    session.set_both_trigger_resistance(1, 2, 3, 4);
    session.set_mic_led(true);
    session.set_player_leds(0x0f);
}

#[test]
fn close_pushes_neutral_then_releases() {
    let (session, device) = open();
    dirty(&session);
    let before = device.push_count();

    session.close();

    assert_eq!(device.push_count(), before + 1);
    let last = device.last_pushed().unwrap();
    assert!(last.is_neutral());
    assert_eq!(last.left_rumble, 0);
    assert_eq!(last.right_trigger_effect, TriggerEffect::NoResistance);
    assert!(device.is_closed());
}

#[test]
fn drop_also_neutralizes() {
    let (session, device) = open();
    dirty(&session);
    drop(session);

    assert!(device.last_pushed().unwrap().is_neutral());
    assert!(device.is_closed());
}

#[test]
fn reopen_after_close_starts_neutral() {
    let device = VirtualDevice::new("virtual:0");
    let transport = VirtualTransport::with_device(device.clone());
    let config = SessionConfig::default();

    let first = Session::open(&transport, &config).unwrap();
    dirty(&first);
    first.close();

    let second = Session::open(&transport, &config).unwrap();
    assert_eq!(second.output_state(), OutputState::neutral());
}

// ---------------------------------------------------------------------------
// Input and push failures
// ---------------------------------------------------------------------------

#[test]
fn input_reads_pass_through() {
    let (session, device) = open();
    let mut out = InputState::default();
    assert!(!session.get_input_state(&mut out));

    let fed = InputState {
        left_trigger: 77,
        buttons_a: 0x01,
        ..Default::default()
    };
    device.feed(fed);
    assert!(session.get_input_state(&mut out));
    assert_eq!(out, fed);
    // Reads never push output.
    assert_eq!(device.push_count(), 0);
}

#[test]
fn input_read_returns_newest_queued_report() {
    let (session, device) = open();
    for left_trigger in [10, 20, 30] {
        device.feed(InputState {
            left_trigger,
            ..Default::default()
        });
    }

    let mut out = InputState::default();
    assert!(session.get_input_state(&mut out));
    assert_eq!(out.left_trigger, 30);
    // Older reports were discarded, not left for the next frame.
    assert!(!session.get_input_state(&mut out));
    assert_eq!(out.left_trigger, 30);
}

#[test]
fn push_failures_are_silent_but_counted() {
    let (session, device) = open();
    device.set_push_failure(true);
    session.set_lightbar(1, 2, 3);
    session.set_rumble(4, 5);

    // The cache still holds the intended state.
    let state = session.output_state();
    assert_eq!(state.lightbar, Color::new(1, 2, 3));
    assert_eq!(state.left_rumble, 4);

    let status = session.push_status();
    assert_eq!((status.pushes, status.failures), (2, 2));
    assert!(status.is_failing());
    assert!(status.last_error.unwrap().contains("injected"));

    device.set_push_failure(false);
    session.set_mic_led(true);
    assert!(!session.push_status().is_failing());
    // The first successful push carries everything set while failing.
    let last = device.last_pushed().unwrap();
    assert_eq!(last.lightbar, Color::new(1, 2, 3));
    assert_eq!(last.right_rumble, 5);
}

// ---------------------------------------------------------------------------
// Disjoint operations commute
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
enum Op {
    Lightbar(u8, u8, u8),
    Rumble(u8, u8),
    Trigger(bool, u8, u8),
    Mic(bool),
    Player(u8),
}

impl Op {
    fn apply(&self, s: &Session<VirtualDevice>) {
        match *self {
            Op::Lightbar(r, g, b) => s.set_lightbar(r, g, b),
            Op::Rumble(l, r) => s.set_rumble(l, r),
            Op::Trigger(left, start, force) => {
                let side = if left { TriggerSide::Left } else { TriggerSide::Right };
                s.set_trigger_resistance(side, start, force)
            }
            Op::Mic(on) => s.set_mic_led(on),
            Op::Player(mask) => s.set_player_leds(mask),
        }
    }

    fn field(&self) -> u8 {
        match self {
            Op::Lightbar(..) => 0,
            Op::Rumble(..) => 1,
            Op::Trigger(true, ..) => 2,
            Op::Trigger(false, ..) => 3,
            Op::Mic(_) => 4,
            Op::Player(_) => 5,
        }
    }
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Op::Lightbar(r, g, b)),
        (any::<u8>(), any::<u8>()).prop_map(|(l, r)| Op::Rumble(l, r)),
        (any::<bool>(), any::<u8>(), any::<u8>()).prop_map(|(l, s, f)| Op::Trigger(l, s, f)),
        any::<bool>().prop_map(Op::Mic),
        (0u8..16).prop_map(Op::Player),
    ]
}

proptest! {
    #[test]
    fn disjoint_operations_commute(a in op(), b in op()) {
        prop_assume!(a.field() != b.field());

        let (ab, _) = open();
        a.apply(&ab);
        b.apply(&ab);

        let (ba, _) = open();
        b.apply(&ba);
        a.apply(&ba);

        prop_assert_eq!(ab.output_state(), ba.output_state());
    }
}
