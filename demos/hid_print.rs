//! Print gamepad input decoded from raw HID reports.
//!
//! Usage: `RUST_LOG=info cargo run --example hid_print --features hid`

use hidapi::HidApi;
use inputflow::backends::hid::{open_gamepad, probe_devices};
use inputflow::gamepad::GamepadConfig;
use inputflow::Logger;
use std::sync::Arc;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut api = HidApi::new().expect("init hidapi");
    let found = probe_devices(&api);
    println!("Discovered {} supported HID gamepad(s)", found.len());
    for (meta, layout) in &found {
        println!("  {meta} ({})", layout.name);
    }

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).expect("read config");
            GamepadConfig::from_toml_str(&text).expect("parse config")
        }
        None => GamepadConfig::default(),
    };
    let (pad, source) = open_gamepad(&mut api, &config).expect("open gamepad");
    let pad = Arc::new(pad);
    pad.bind_all(Logger::new(&pad));

    let worker = pad.background_loop(source, false).expect("spawn worker");
    if let Err(e) = worker.join() {
        eprintln!("gamepad loop ended: {e}");
    }
}
