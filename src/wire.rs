//! Fixed-width keymap wire record
//!
//! One record describes a request or response for a single table entry. The
//! layout is normative and must interoperate bit-for-bit with existing
//! counterparts:
//!
//! ```text
//! offset  width  field
//!      0      1  flags     bit 0 = locate by index (else by scancode)
//!      1      1  len       valid scancode bytes, 0..=32
//!      2      2  index     locator when the flag is set; resolved index on response
//!      4      4  keycode   requested (set) or resulting (get) keycode
//!      8     32  scancode  raw bytes; only the first `len` are significant
//! ```
//!
//! Integers are machine-endian.

use crate::keymap::{EntryInfo, Locator, MapError, Scancode, MAX_SCANCODE_LEN};

/// Flag bit 0: locate the entry by `index` instead of by `scancode`.
pub const KEYMAP_BY_INDEX: u8 = 1 << 0;

/// Encoded record width in bytes.
pub const RECORD_LEN: usize = 40;

/// A single request/response record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeymapRecord {
    pub flags: u8,
    pub len: u8,
    pub index: u16,
    pub keycode: u32,
    pub scancode: [u8; MAX_SCANCODE_LEN],
}

impl Default for KeymapRecord {
    fn default() -> Self {
        Self {
            flags: 0,
            len: 0,
            index: 0,
            keycode: 0,
            scancode: [0; MAX_SCANCODE_LEN],
        }
    }
}

impl KeymapRecord {
    /// Request record locating an entry by table index
    pub fn by_index(index: u16) -> Self {
        Self {
            flags: KEYMAP_BY_INDEX,
            index,
            ..Self::default()
        }
    }

    /// Request record locating an entry by scancode bytes
    pub fn by_scancode(scancode: &Scancode) -> Self {
        let mut bytes = [0; MAX_SCANCODE_LEN];
        bytes[..scancode.len()].copy_from_slice(scancode.as_bytes());
        Self {
            len: scancode.len() as u8,
            scancode: bytes,
            ..Self::default()
        }
    }

    /// The significant scancode bytes, rejecting a `len` claim beyond the
    /// buffer
    pub fn scancode_bytes(&self) -> Result<&[u8], MapError> {
        let len = self.len as usize;
        if len > MAX_SCANCODE_LEN {
            return Err(MapError::InvalidLength);
        }
        Ok(&self.scancode[..len])
    }

    /// Extract the locator this record carries; dispatch is exclusive on
    /// the by-index flag
    pub fn locator(&self) -> Result<Locator<'_>, MapError> {
        if self.flags & KEYMAP_BY_INDEX != 0 {
            Ok(Locator::ByIndex(self.index))
        } else {
            Ok(Locator::ByScancode(self.scancode_bytes()?))
        }
    }

    /// Populate the response fields from a resolved entry
    pub fn fill_entry(&mut self, info: &EntryInfo) {
        self.keycode = info.keycode;
        self.index = info.index as u16;
        self.len = info.scancode.len() as u8;
        self.scancode = [0; MAX_SCANCODE_LEN];
        self.scancode[..info.scancode.len()].copy_from_slice(info.scancode.as_bytes());
    }

    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut buf = [0u8; RECORD_LEN];
        buf[0] = self.flags;
        buf[1] = self.len;
        buf[2..4].copy_from_slice(&self.index.to_ne_bytes());
        buf[4..8].copy_from_slice(&self.keycode.to_ne_bytes());
        buf[8..RECORD_LEN].copy_from_slice(&self.scancode);
        buf
    }

    /// Decode a record from exactly 40 bytes
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() != RECORD_LEN {
            return None;
        }
        let mut scancode = [0u8; MAX_SCANCODE_LEN];
        scancode.copy_from_slice(&buf[8..RECORD_LEN]);
        Some(Self {
            flags: buf[0],
            len: buf[1],
            index: u16::from_ne_bytes(buf[2..4].try_into().ok()?),
            keycode: u32::from_ne_bytes(buf[4..8].try_into().ok()?),
            scancode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_by_index() {
        let record = KeymapRecord {
            flags: KEYMAP_BY_INDEX,
            len: 0,
            index: 3,
            keycode: 0x2a,
            scancode: [0; MAX_SCANCODE_LEN],
        };
        let decoded = KeymapRecord::decode(&record.encode()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_round_trip_by_scancode() {
        let scancode = Scancode::from_hex("0000e005").unwrap();
        let record = KeymapRecord::by_scancode(&scancode);
        let decoded = KeymapRecord::decode(&record.encode()).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.scancode_bytes().unwrap(), scancode.as_bytes());
    }

    #[test]
    fn test_decode_rejects_wrong_width() {
        assert!(KeymapRecord::decode(&[0u8; 39]).is_none());
        assert!(KeymapRecord::decode(&[0u8; 41]).is_none());
    }

    #[test]
    fn test_layout_offsets() {
        let mut record = KeymapRecord::by_index(0x0102);
        record.keycode = 0x0a0b0c0d;
        let buf = record.encode();
        assert_eq!(buf[0], KEYMAP_BY_INDEX);
        assert_eq!(u16::from_ne_bytes([buf[2], buf[3]]), 0x0102);
        assert_eq!(
            u32::from_ne_bytes([buf[4], buf[5], buf[6], buf[7]]),
            0x0a0b0c0d
        );
    }

    #[test]
    fn test_locator_dispatch_is_flag_exclusive() {
        let scancode = Scancode::from_hex("1122").unwrap();
        let mut record = KeymapRecord::by_scancode(&scancode);
        assert!(matches!(
            record.locator().unwrap(),
            Locator::ByScancode(bytes) if bytes == scancode.as_bytes()
        ));

        // With the flag set, the scancode payload is not consulted.
        record.flags = KEYMAP_BY_INDEX;
        record.index = 7;
        assert!(matches!(record.locator().unwrap(), Locator::ByIndex(7)));
    }

    #[test]
    fn test_oversized_len_claim_rejected() {
        let mut record = KeymapRecord::default();
        record.len = 33;
        assert_eq!(record.scancode_bytes(), Err(MapError::InvalidLength));
        assert!(record.locator().is_err());
    }

    #[test]
    fn test_fill_entry_zeroes_stale_bytes() {
        let wide = Scancode::from_hex("00112233").unwrap();
        let narrow = Scancode::from_hex("44").unwrap();
        let mut record = KeymapRecord::by_scancode(&wide);
        record.fill_entry(&crate::keymap::EntryInfo {
            index: 2,
            scancode: narrow,
            keycode: 9,
        });
        assert_eq!(record.index, 2);
        assert_eq!(record.len, 1);
        assert_eq!(&record.scancode[1..], &[0u8; 31]);
    }
}
