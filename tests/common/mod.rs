//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use evmap::device::{DeviceConfig, TableDevice};
use evmap::keymap::{KeyEntry, KeyEntryTable, KeymapEngine, Scancode};

pub fn sc(hex: &str) -> Scancode {
    Scancode::from_hex(hex).unwrap()
}

/// Engine over the given entries, tracker derived at construction
pub fn engine(entries: Vec<KeyEntry>) -> KeymapEngine {
    KeymapEngine::new(KeyEntryTable::new(entries).unwrap())
}

/// A device table resembling a laptop hotkey keyboard
pub fn laptop_device() -> TableDevice {
    let config: DeviceConfig = serde_yaml::from_str(
        r#"
name: test laptop hotkeys
entries:
  - scancode: "0000e005"
    keycode: BRIGHTNESSDOWN
  - scancode: "0000e006"
    keycode: BRIGHTNESSUP
  - scancode: "0000e007"
    keycode: BATTERY
  - scancode: "0000e011"
    keycode: WLAN
  - scancode: "0000e00d"
    keycode: 0
    type: ignore
"#,
    )
    .unwrap();
    TableDevice::from_config("test laptop hotkeys", config).unwrap()
}
