use inputflow::backends::virtual_input;
use inputflow::gamepad::{self, codes, GamepadInput, GamepadSource, RawGamepadEvent};
use inputflow::keyboard::{self, Key, KeyboardSource};
use inputflow::metadata::DeviceMeta;
use inputflow::{EngineConfig, EngineError, EventRecord, StopToken};
use inputflow::binding::on_trigger;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn worker_dispatches_in_production_order() {
    let meta = DeviceMeta::named("Wireless Controller");
    let preset = gamepad::presets::find_preset(&meta.name);
    let pad = Arc::new(gamepad::engine_for(&meta, preset, &EngineConfig::default()).unwrap());

    let (tx, rx) = mpsc::channel();
    let tx = std::sync::Mutex::new(tx);
    pad.bind_all(move |record: &EventRecord<GamepadInput>| {
        let _ = tx.lock().unwrap().send(*record);
    });

    let (feed, device) = virtual_input::channel::<RawGamepadEvent>(meta);
    let worker = pad.background_loop(GamepadSource::new(device), false).unwrap();
    assert!(!worker.is_daemon());

    feed.press_button(codes::BTN_SOUTH).unwrap();
    feed.set_axis(codes::ABS_X, 256).unwrap();
    feed.sync().unwrap();
    feed.release_button(codes::BTN_SOUTH).unwrap();

    let got: Vec<EventRecord<GamepadInput>> =
        (0..3).map(|_| rx.recv_timeout(WAIT).unwrap()).collect();
    assert_eq!(
        got,
        vec![
            EventRecord::new(GamepadInput::Cross, 1.0),
            EventRecord::new(GamepadInput::LH, 1.0),
            EventRecord::new(GamepadInput::Cross, 0.0),
        ]
    );

    worker.stop();
    worker.join().unwrap();
}

#[test]
fn bindings_can_change_while_a_worker_dispatches() {
    let keys = Arc::new(keyboard::engine(0.0).unwrap());
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    let weak = Arc::downgrade(&keys);
    // binds from inside dispatch, on the worker thread
    keys.bind_all(move |record: &EventRecord<Key>| {
        if let Some(keys) = weak.upgrade() {
            keys.bind(Key::Char('b'), on_trigger(|| {})).unwrap();
        }
        let _ = tx.lock().unwrap().send(*record);
    });

    let (feed, source) = KeyboardSource::new("busy");
    let worker = keys.background_loop(source, false).unwrap();

    for i in 0..50 {
        feed.tap('a').unwrap();
        if i % 5 == 0 {
            keys.bind(Key::Char('z'), on_trigger(|| {})).unwrap();
            keys.bind(Key::Char('z'), on_trigger(|| {})).unwrap();
        }
    }

    let got: Vec<f32> = (0..100)
        .map(|_| rx.recv_timeout(WAIT).unwrap())
        .map(|record| {
            assert_eq!(record.input, Key::Char('a'));
            record.value
        })
        .collect();
    let expected: Vec<f32> = (0..50).flat_map(|_| [1.0, 0.0]).collect();
    assert_eq!(got, expected);
    assert_eq!(keys.bound_count(&Key::Char('b')), 100);
    assert_eq!(keys.bound_count(&Key::Char('z')), 20);
    assert_eq!(keys.global_count(), 1);

    worker.stop();
    worker.join().unwrap();
}

#[test]
fn disconnect_terminates_the_worker_with_an_error() {
    let keys = Arc::new(keyboard::engine(0.0).unwrap());
    let (feed, source) = KeyboardSource::new("detachable");
    let worker = keys.background_loop(source, false).unwrap();

    feed.tap('k').unwrap();
    drop(feed);

    assert!(matches!(
        worker.join(),
        Err(EngineError::Disconnected(name)) if name == "detachable"
    ));
}

#[test]
fn stop_ends_an_idle_worker() {
    let keys = Arc::new(keyboard::engine(0.0).unwrap());
    let (_feed, source) = KeyboardSource::new("idle");
    let worker = keys.background_loop(source, true).unwrap();
    assert!(worker.is_daemon());

    let token = worker.stop_token();
    token.stop();
    assert!(token.is_stopped());
    worker.join().unwrap();
}

#[test]
fn run_returns_immediately_when_already_stopped() {
    let keys = keyboard::engine(0.0).unwrap();
    let (feed, mut source) = KeyboardSource::new("inline");
    feed.press(Key::Char('z')).unwrap();

    let stop = StopToken::new();
    stop.stop();
    keys.run(&mut source, &stop).unwrap();
}

#[test]
fn run_inline_until_the_device_goes_away() {
    let keys = keyboard::engine(0.0).unwrap();
    let (feed, mut source) = KeyboardSource::new("inline");
    let (tx, rx) = mpsc::channel();
    let tx = std::sync::Mutex::new(tx);
    keys.bind_all(move |record: &EventRecord<Key>| {
        let _ = tx.lock().unwrap().send((record.input, record.value));
    });

    feed.tap('a').unwrap();
    drop(feed);

    let result = keys.run(&mut source, &StopToken::new());
    assert!(matches!(result, Err(EngineError::Disconnected(_))));
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![(Key::Char('a'), 1.0), (Key::Char('a'), 0.0)]
    );
}
