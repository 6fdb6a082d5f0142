//! Core types for the keymap table: Scancode, EntryType, KeyEntry

use std::fmt;

/// Maximum scancode width in bytes, fixed by the wire record layout.
pub const MAX_SCANCODE_LEN: usize = 32;

/// The reserved "no mapping" keycode.
pub const KEY_RESERVED: u32 = 0;

/// Whether an entry's keycode is currently delivered or suppressed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryType {
    /// Actively mapped: the keycode is delivered upstream
    Key,
    /// Present in the table but not delivered upstream
    Ignored,
}

/// A raw, device-specific scancode: 0..=32 opaque bytes
///
/// Scancodes are compared for equality as raw bytes of exact length, never
/// interpreted numerically. Storage order is machine-endian; the hex form
/// used for display and parsing reads most-significant byte first, so it is
/// the reverse of storage order on little-endian hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Scancode {
    bytes: [u8; MAX_SCANCODE_LEN],
    len: u8,
}

impl Scancode {
    /// Create a scancode from raw machine-endian bytes
    ///
    /// Returns `None` if more than 32 bytes are given. Unused trailing
    /// bytes are zeroed so derived equality stays well-defined.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > MAX_SCANCODE_LEN {
            return None;
        }
        let mut buf = [0u8; MAX_SCANCODE_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(Self {
            bytes: buf,
            len: bytes.len() as u8,
        })
    }

    /// Parse a hex string in display order (most-significant byte first)
    ///
    /// The string must have even length and describe at most 32 bytes.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() % 2 != 0 || hex.len() > MAX_SCANCODE_LEN * 2 {
            return None;
        }
        let mut display = Vec::with_capacity(hex.len() / 2);
        for i in (0..hex.len()).step_by(2) {
            let byte = u8::from_str_radix(hex.get(i..i + 2)?, 16).ok()?;
            display.push(byte);
        }
        if cfg!(target_endian = "little") {
            display.reverse();
        }
        Self::from_bytes(&display)
    }

    /// The significant bytes, in machine-endian storage order
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of significant bytes
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Exact-length byte comparison against a raw locator
    pub fn matches(&self, bytes: &[u8]) -> bool {
        self.as_bytes() == bytes
    }

    /// Hex form in display order (most-significant byte first)
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(self.len() * 2);
        let significant = self.as_bytes();
        if cfg!(target_endian = "little") {
            for byte in significant.iter().rev() {
                out.push_str(&format!("{:02x}", byte));
            }
        } else {
            for byte in significant {
                out.push_str(&format!("{:02x}", byte));
            }
        }
        out
    }
}

impl fmt::Display for Scancode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One row of the keymap table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEntry {
    pub scancode: Scancode,
    pub keycode: u32,
    pub entry_type: EntryType,
}

impl KeyEntry {
    pub fn new(entry_type: EntryType, scancode: Scancode, keycode: u32) -> Self {
        Self {
            scancode,
            keycode,
            entry_type,
        }
    }

    /// An actively mapped entry
    pub fn key(scancode: Scancode, keycode: u32) -> Self {
        Self::new(EntryType::Key, scancode, keycode)
    }

    /// A present-but-suppressed entry
    pub fn ignored(scancode: Scancode, keycode: u32) -> Self {
        Self::new(EntryType::Ignored, scancode, keycode)
    }

    pub fn is_key(&self) -> bool {
        self.entry_type == EntryType::Key
    }
}
