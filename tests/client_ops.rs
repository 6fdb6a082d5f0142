//! Client behavior end to end: dumps, edits, and fatal conditions

mod common;

use std::io::Write as _;

use common::laptop_device;
use evmap::client::{self, ClientError};
use evmap::device::{KeymapDevice, TableDevice};
use evmap::keymap::MapError;
use evmap::wire::KeymapRecord;

fn dump(device: &dyn KeymapDevice) -> String {
    let mut out = Vec::new();
    client::print_keymap(device, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn dump_renders_the_whole_table() {
    let device = laptop_device();
    let expected = "\
index scancode    keycode name
    0 0000e005       0xe0 BRIGHTNESSDOWN
    1 0000e006       0xe1 BRIGHTNESSUP
    2 0000e007       0xec BATTERY
    3 0000e011       0xee WLAN
    4 0000e00d          0 RESERVED
";
    assert_eq!(dump(&device), expected);
}

#[test]
fn enumeration_stops_exactly_at_table_length() {
    let device = laptop_device();
    let output = dump(&device);
    // Header plus one row per entry, nothing past the first NotFound
    assert_eq!(output.lines().count(), 1 + 5);
}

#[test]
fn dump_prints_question_mark_for_unnamed_keycodes() {
    let config = serde_yaml::from_str(
        r#"
entries:
  - scancode: "01"
    keycode: 0x2ff
"#,
    )
    .unwrap();
    let device = TableDevice::from_config("unnamed", config).unwrap();
    let output = dump(&device);
    assert!(output.lines().nth(1).unwrap().ends_with("0x2ff ?"));
}

#[test]
fn edit_by_scancode_reports_previous_keycode() {
    let mut device = laptop_device();
    let outcome = client::set_keycode(&mut device, "0000e011=0x0").unwrap();
    assert_eq!(outcome.old_keycode, 0xee);
    assert_eq!(outcome.new_keycode, 0);

    // The entry is now suppressed and dumps as RESERVED
    let output = dump(&device);
    assert!(output.contains("    3 0000e011          0 RESERVED"));
}

#[test]
fn edit_by_index_with_symbolic_name() {
    let mut device = laptop_device();
    let outcome = client::set_keycode(&mut device, "4:0000e00d=MICMUTE").unwrap();
    assert_eq!(outcome.old_keycode, 0);
    assert!(dump(&device).contains("    4 0000e00d       0xf8 MICMUTE"));
}

#[test]
fn edit_of_missing_scancode_is_fatal() {
    let mut device = laptop_device();
    let err = client::set_keycode(&mut device, "deadbeef=A").unwrap_err();
    assert!(matches!(err, ClientError::Engine(MapError::NotFound)));
}

#[test]
fn malformed_expressions_fail_before_any_device_call() {
    let mut device = laptop_device();
    for expr in ["0000e005", "123=A", "0000e005=NOT_A_KEY"] {
        let err = client::set_keycode(&mut device, expr).unwrap_err();
        assert!(
            matches!(err, ClientError::InvalidExpr(_) | ClientError::UnknownKey(_)),
            "expected parse failure for {:?}, got {}",
            expr,
            err
        );
    }
    // Nothing was mutated by the rejected expressions
    assert!(dump(&device).contains("0000e005       0xe0"));
}

/// Device that resolves every index one off, as a buggy hosting layer might
struct SkewedDevice(TableDevice);

impl KeymapDevice for SkewedDevice {
    fn name(&self) -> &str {
        "skewed"
    }

    fn keymap_entry(&self, record: &mut KeymapRecord) -> Result<(), MapError> {
        self.0.keymap_entry(record)?;
        record.index = record.index.wrapping_add(1);
        Ok(())
    }

    fn set_keymap_entry(&mut self, record: &KeymapRecord) -> Result<u32, MapError> {
        self.0.set_keymap_entry(record)
    }
}

#[test]
fn dump_aborts_on_index_mismatch() {
    let device = SkewedDevice(laptop_device());
    let mut out = Vec::new();
    let err = client::print_keymap(&device, &mut out).unwrap_err();
    assert!(matches!(err, ClientError::Inconsistent(_)));
    assert!(err.to_string().contains("1 != 0"));
}

/// Device that claims an oversized scancode length on every response
struct OversizedDevice(TableDevice);

impl KeymapDevice for OversizedDevice {
    fn name(&self) -> &str {
        "oversized"
    }

    fn keymap_entry(&self, record: &mut KeymapRecord) -> Result<(), MapError> {
        self.0.keymap_entry(record)?;
        record.len = 33;
        Ok(())
    }

    fn set_keymap_entry(&mut self, record: &KeymapRecord) -> Result<u32, MapError> {
        self.0.set_keymap_entry(record)
    }
}

#[test]
fn dump_aborts_on_oversized_length_claim() {
    let device = OversizedDevice(laptop_device());
    let mut out = Vec::new();
    let err = client::print_keymap(&device, &mut out).unwrap_err();
    assert!(matches!(err, ClientError::Inconsistent(_)));
    assert!(err.to_string().contains("33 > 32"));
}

#[test]
fn device_table_loads_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
name: file-backed keyboard
entries:
  - scancode: "00010081"
    keycode: POWER
"#
    )
    .unwrap();

    let device = TableDevice::load(file.path()).unwrap();
    assert_eq!(device.name(), "file-backed keyboard");
    assert!(dump(&device).contains("    0 00010081       0x74 POWER"));
}

#[test]
fn load_reports_offending_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
entries:
  - scancode: "00010081"
    keycode: NOT_A_KEY
"#
    )
    .unwrap();

    let err = TableDevice::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("NOT_A_KEY"));
}
