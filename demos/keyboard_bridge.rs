//! Drive a gamepad engine from a keyboard.
//!
//! WASD is bridged onto the left stick, space onto cross. The keyboard is a
//! virtual device fed by a scripted sequence; gamepad dispatches are printed
//! as JSON lines.

use inputflow::gamepad::{self, GamepadInput};
use inputflow::keyboard::{self, Key, KeyboardSource, SpecialKey};
use inputflow::metadata::DeviceMeta;
use inputflow::{connect, EngineConfig, EventRecord};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
    env_logger::init();

    let keys = Arc::new(keyboard::engine(0.0).expect("keyboard engine"));
    let pad = Arc::new(
        gamepad::engine_for(&DeviceMeta::named("virtual pad"), None, &EngineConfig::default())
            .expect("gamepad engine"),
    );

    pad.bind_all(|record: &EventRecord<GamepadInput>| {
        println!("{}", serde_json::to_string(record).expect("serialize record"));
    });

    for (key, input) in [('d', GamepadInput::LH), ('s', GamepadInput::LV)] {
        connect(&keys, Key::Char(key), &pad, input).expect("bridge");
    }
    connect(&keys, Key::Special(SpecialKey::Space), &pad, GamepadInput::Cross).expect("bridge");

    let (feed, source) = KeyboardSource::new("scripted keyboard");
    let worker = keys.background_loop(source, false).expect("spawn worker");

    feed.press('d').expect("feed");
    feed.tap(SpecialKey::Space).expect("feed");
    feed.release('d').expect("feed");
    feed.tap('s').expect("feed");
    feed.tap('x').expect("feed"); // not bridged

    thread::sleep(Duration::from_millis(200));
    worker.stop();
    worker.join().expect("worker");
}
