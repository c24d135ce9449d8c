//! Print every gamepad input change.
//!
//! Usage: `RUST_LOG=info cargo run --example gamepad_print [config.toml]`

use inputflow::backends::evdev::open_gamepad;
use inputflow::gamepad::GamepadConfig;
use inputflow::Logger;
use std::sync::Arc;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).expect("read config");
            GamepadConfig::from_toml_str(&text).expect("parse config")
        }
        None => GamepadConfig {
            discovery_interval_ms: Some(1000),
            ..GamepadConfig::default()
        },
    };

    let (pad, source) = open_gamepad(&config).expect("connect gamepad");
    let pad = Arc::new(pad);
    pad.bind_all(Logger::new(&pad));

    // Non-daemon: dropping the worker at the end of main waits for the loop,
    // which runs until the pad disconnects.
    let worker = pad.background_loop(source, false).expect("spawn worker");
    if let Err(e) = worker.join() {
        eprintln!("gamepad loop ended: {e}");
    }
}
