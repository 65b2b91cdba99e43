use std::cell::RefCell;
use std::rc::Rc;

use cuetime_rs::core::Color;
use cuetime_rs::options::{OptionStore, OptionValue};

#[test]
fn defaults_cover_the_audio_keys() {
    let store = OptionStore::with_defaults();
    assert!(!store.get_bool("Audio/Snap/Enable"));
    assert_eq!(store.get_int("Audio/Snap/Distance"), 10);
    assert_eq!(store.get_int("Audio/Start Drag Sensitivity"), 6);
    assert!(store.get_bool("Audio/Auto/Commit"));
    assert_eq!(store.get_int("Timing/Default Duration"), 2000);
}

#[test]
fn set_and_get_round_trip() {
    let mut store = OptionStore::with_defaults();
    store.set_bool("Audio/Snap/Enable", true);
    assert!(store.get_bool("Audio/Snap/Enable"));
    store.set_int("Audio/Lead/IN", 500);
    assert_eq!(store.get_int("Audio/Lead/IN"), 500);
}

#[test]
fn every_registered_kind_has_typed_access() {
    let mut store = OptionStore::new();
    store.register("Audio/Volume", OptionValue::Double(0.75));
    store.register("Audio/Player", OptionValue::Str("pulse".to_owned()));

    assert_eq!(store.get_double("Audio/Volume"), 0.75);
    assert_eq!(store.get_str("Audio/Player"), "pulse");

    store.set_double("Audio/Volume", 0.5);
    store.set_str("Audio/Player", "alsa");
    assert_eq!(store.get_double("Audio/Volume"), 0.5);
    assert_eq!(store.get_str("Audio/Player"), "alsa");
}

#[test]
#[should_panic(expected = "expected int, found bool")]
fn type_confused_access_is_fatal() {
    let store = OptionStore::with_defaults();
    let _ = store.get_int("Audio/Snap/Enable");
}

#[test]
#[should_panic(expected = "unknown option")]
fn unknown_option_is_fatal() {
    let store = OptionStore::with_defaults();
    let _ = store.get_bool("Audio/No Such Key");
}

#[test]
#[should_panic(expected = "expected bool, found int")]
fn type_confused_set_is_fatal() {
    let mut store = OptionStore::with_defaults();
    store.set_int("Audio/Snap/Enable", 1);
}

#[test]
fn subscribers_see_changes_for_their_key_only() {
    let mut store = OptionStore::with_defaults();
    let seen: Rc<RefCell<Vec<OptionValue>>> = Rc::default();

    let _connection = {
        let seen = Rc::clone(&seen);
        store.subscribe("Audio/Snap/Enable", move |value| {
            seen.borrow_mut().push(value.clone());
        })
    };

    store.set_bool("Audio/Snap/Enable", true);
    store.set_int("Audio/Snap/Distance", 25);

    assert_eq!(*seen.borrow(), vec![OptionValue::Bool(true)]);
}

#[test]
fn reset_restores_the_registered_default() {
    let mut store = OptionStore::with_defaults();
    store.set_int("Audio/Lead/OUT", 999);
    store.reset("Audio/Lead/OUT");
    assert_eq!(store.get_int("Audio/Lead/OUT"), 300);
}

#[test]
fn colors_and_lists_round_trip_through_json() {
    let mut store = OptionStore::new();
    store.register(
        "Colour/Audio Display/Line Boundary Start",
        OptionValue::Color(Color::rgb(216, 47, 47)),
    );
    store.register(
        "Audio/Recent Zoom Levels",
        OptionValue::IntList(vec![0, 4, -3]),
    );

    let json = store.to_json_pretty().expect("serialize");
    let mut restored = OptionStore::new();
    restored.register(
        "Colour/Audio Display/Line Boundary Start",
        OptionValue::Color(Color::rgb(0, 0, 0)),
    );
    restored.register("Audio/Recent Zoom Levels", OptionValue::IntList(Vec::new()));
    restored.load_json_str(&json).expect("parse");

    assert_eq!(
        restored.get_color("Colour/Audio Display/Line Boundary Start"),
        Color::rgb(216, 47, 47)
    );
}

#[test]
fn color_formats_as_hex() {
    assert_eq!(Color::rgb(216, 47, 47).rgb_formatted(), "#d82f2f");
}
