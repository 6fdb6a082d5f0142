//! Query/mutate client: full-table dumps and single-entry edits
//!
//! Drives a [`KeymapDevice`] end to end through the wire protocol. A dump
//! walks indices upward until the device reports no entry; an edit parses a
//! `[index:]scancode=keycode` expression, issues one set, and reports the
//! previous keycode. Every failure other than the end-of-table signal is
//! fatal and surfaced to the operator with the offending value.

use std::fmt;
use std::io::Write;

use tracing::debug;

use crate::device::KeymapDevice;
use crate::keymap::{MapError, Scancode, MAX_SCANCODE_LEN, MAX_TABLE_LEN};
use crate::names;
use crate::wire::{KeymapRecord, KEYMAP_BY_INDEX};

/// Fatal client-side failures
#[derive(Debug, Clone)]
pub enum ClientError {
    /// The device reported an error other than end-of-table
    Engine(MapError),
    /// A response contradicted the request; engine or hosting bug
    Inconsistent(String),
    /// Malformed edit expression
    InvalidExpr(String),
    /// Unresolvable keycode token
    UnknownKey(String),
    Io(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Engine(e) => write!(f, "keymap operation failed: {}", e),
            ClientError::Inconsistent(s) => write!(f, "Inconsistency detected: {}", s),
            ClientError::InvalidExpr(s) => write!(f, "Invalid definition: {}", s),
            ClientError::UnknownKey(k) => write!(f, "Unknown key: {}", k),
            ClientError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Io(e.to_string())
    }
}

/// Result of a successful single-entry edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    pub old_keycode: u32,
    pub new_keycode: u32,
}

/// Keycode in the dump's hex convention: `{:#x}`, except zero prints as `0`
pub fn format_keycode(code: u32) -> String {
    if code == 0 {
        "0".to_string()
    } else {
        format!("{:#x}", code)
    }
}

/// Keycode with its symbolic name when one exists, e.g. `0xe0 (BRIGHTNESSDOWN)`
pub fn describe_keycode(code: u32) -> String {
    match names::key_by_code(code) {
        Some(name) => format!("{} ({})", format_keycode(code), name),
        None => format_keycode(code),
    }
}

/// Dump the whole table, one row per entry, in index order
///
/// Queries indices 0, 1, 2, … until the device signals no entry; a response
/// whose resolved index differs from the request, or whose scancode length
/// exceeds 32, is a fatal consistency error.
pub fn print_keymap(device: &dyn KeymapDevice, out: &mut dyn Write) -> Result<(), ClientError> {
    writeln!(out, "{:>5} {:>8} {:>10} {}", "index", "scancode", "keycode", "name")?;

    for index in 0..MAX_TABLE_LEN {
        let mut record = KeymapRecord::by_index(index as u16);
        match device.keymap_entry(&mut record) {
            Ok(()) => {}
            Err(MapError::NotFound) => break,
            Err(e) => return Err(ClientError::Engine(e)),
        }
        if record.index as usize != index {
            return Err(ClientError::Inconsistent(format!(
                "index: {} != {}",
                record.index, index
            )));
        }
        if record.len as usize > MAX_SCANCODE_LEN {
            return Err(ClientError::Inconsistent(format!(
                "len: {} > {}",
                record.len, MAX_SCANCODE_LEN
            )));
        }
        // Length was validated above, so this cannot fail
        let scancode = Scancode::from_bytes(&record.scancode[..record.len as usize])
            .ok_or_else(|| ClientError::Inconsistent(format!("len: {}", record.len)))?;
        let name = names::key_by_code(record.keycode).unwrap_or("?");
        writeln!(
            out,
            "{:>5} {:>8} {:>10} {}",
            index,
            scancode.to_hex(),
            format_keycode(record.keycode),
            name
        )?;
    }
    Ok(())
}

/// Parse a locator+edit expression of shape `[index:]scancode_hex=keycode`
///
/// The index prefix is a decimal table index; the hex part reads
/// most-significant byte first, must have even length and describe at most
/// 32 bytes, and may be empty when an index is given; the keycode token is a
/// symbolic name or an integer literal.
pub fn parse_edit(expr: &str) -> Result<KeymapRecord, ClientError> {
    let (locator_part, keycode_part) = expr
        .split_once('=')
        .ok_or_else(|| ClientError::InvalidExpr(expr.to_string()))?;

    let (index, hex) = match locator_part.split_once(':') {
        Some((prefix, rest)) => {
            let index: u16 = prefix
                .parse()
                .map_err(|_| ClientError::InvalidExpr(expr.to_string()))?;
            (Some(index), rest)
        }
        None => (None, locator_part),
    };

    let scancode =
        Scancode::from_hex(hex).ok_or_else(|| ClientError::InvalidExpr(expr.to_string()))?;
    let keycode = names::key_by_name(keycode_part)
        .ok_or_else(|| ClientError::UnknownKey(keycode_part.to_string()))?;

    let mut record = KeymapRecord::by_scancode(&scancode);
    record.keycode = keycode;
    if let Some(index) = index {
        record.flags |= KEYMAP_BY_INDEX;
        record.index = index;
    }
    Ok(record)
}

/// Parse one edit expression and apply it with a single set call
pub fn set_keycode(device: &mut dyn KeymapDevice, expr: &str) -> Result<EditOutcome, ClientError> {
    let record = parse_edit(expr)?;
    debug!(
        device = device.name(),
        flags = record.flags,
        index = record.index,
        len = record.len,
        keycode = record.keycode,
        "setting keymap entry"
    );
    let old_keycode = device
        .set_keymap_entry(&record)
        .map_err(ClientError::Engine)?;
    Ok(EditOutcome {
        old_keycode,
        new_keycode: record.keycode,
    })
}
