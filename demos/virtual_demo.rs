use ds5bridge::backends::virtual_device::{VirtualDevice, VirtualTransport};
use ds5bridge::{InputState, Session, SessionConfig, TriggerSide};

fn main() {
    // A virtual controller records every full-state report it receives
    let device = VirtualDevice::new("virtual:demo");
    let transport = VirtualTransport::with_device(device.clone());
    let session = Session::open(&transport, &SessionConfig::default()).expect("open session");
    println!("Opened {}", session.device_info());

    // Each call changes one thing; the rest of the state is carried along
    session.set_lightbar(255, 0, 255);
    session.set_trigger_resistance(TriggerSide::Right, 40, 180);
    session.set_rumble(0, 64);
    session.set_player_leds(0b00100);

    // Inject input and read it back
    device.feed(InputState {
        left_trigger: 128,
        ..Default::default()
    });
    let mut input = InputState::default();
    if session.get_input_state(&mut input) {
        println!("(Virtual) L2 = {}", input.left_trigger);
    }

    session.close();

    for (i, state) in device.pushed().iter().enumerate() {
        println!(
            "push {}: lightbar={:?} rumble=({}, {}) right={:?} leds={:#07b} neutral={}",
            i,
            state.lightbar,
            state.left_rumble,
            state.right_rumble,
            state.right_trigger_effect,
            state.player_leds.bitmask,
            state.is_neutral()
        );
    }
}
