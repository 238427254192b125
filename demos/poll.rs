use std::time::{Duration, Instant};

use ds5bridge::backends::hid;
use ds5bridge::input::buttons;
use ds5bridge::{logger, InputState};

fn main() {
    logger::init();

    let session = match hid::open_default() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("DualSense init failed: {e}");
            return;
        }
    };
    println!("Opened {}", session.device_info());
    session.set_lightbar(255, 0, 255);

    // Roughly one host frame per iteration
    let frame = Duration::from_millis(16);
    let mut input = InputState::default();
    let mut last_print = Instant::now();

    loop {
        if session.get_input_state(&mut input) {
            // Triggers drive rumble so there is something to feel
            session.set_rumble(input.left_trigger, input.right_trigger);

            if last_print.elapsed() >= Duration::from_millis(100) {
                println!(
                    "LS=({:4},{:4}) RS=({:4},{:4}) L2={:3} R2={:3} battery={}/10",
                    input.left_stick_x,
                    input.left_stick_y,
                    input.right_stick_x,
                    input.right_stick_y,
                    input.left_trigger,
                    input.right_trigger,
                    input.battery.level
                );
                last_print = Instant::now();
            }

            if input.pressed_b(buttons::PLAYSTATION_LOGO) {
                println!("PS pressed, exiting");
                break;
            }
        }
        std::thread::sleep(frame);
    }

    session.close();
}
