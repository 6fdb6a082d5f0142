//! Device boundary: anything that answers keymap wire records
//!
//! The engine is driven through two synchronous call-compatible operations,
//! get and set, each speaking one [`KeymapRecord`]. A hosting integration
//! can substitute its own [`KeymapDevice`] for the in-memory [`TableDevice`]
//! without the client noticing.
//!
//! Device tables are described by YAML files:
//!
//! ```yaml
//! name: USB-compliant keyboard System Control
//! entries:
//!   - scancode: "00010081"
//!     keycode: POWER
//!   - scancode: "0000e005"
//!     keycode: 0xe0
//!   - scancode: "0000e00d"
//!     keycode: 0
//!     type: ignore
//! ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::keymap::{
    EntryType, KeyEntry, KeyEntryTable, KeymapEngine, MapError, Scancode, MAX_TABLE_LEN,
};
use crate::names;
use crate::wire::KeymapRecord;

/// A target for keymap queries and edits
///
/// Both operations are synchronous and return a single value or a failure
/// code; no calling convention beyond that is assumed.
pub trait KeymapDevice {
    /// Human-readable device identity, for reports
    fn name(&self) -> &str;

    /// Resolve the record's locator and fill in the response fields
    fn keymap_entry(&self, record: &mut KeymapRecord) -> Result<(), MapError>;

    /// Rewrite the located entry from the record, returning the previous
    /// keycode
    fn set_keymap_entry(&mut self, record: &KeymapRecord) -> Result<u32, MapError>;
}

/// In-memory device backed by a [`KeymapEngine`]
#[derive(Debug, Clone)]
pub struct TableDevice {
    name: String,
    engine: KeymapEngine,
}

impl TableDevice {
    pub fn new(name: impl Into<String>, engine: KeymapEngine) -> Self {
        Self {
            name: name.into(),
            engine,
        }
    }

    /// Load a device table from a YAML file
    pub fn load(path: &Path) -> Result<Self, DeviceError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DeviceError::Io(e.to_string()))?;
        let config: DeviceConfig =
            serde_yaml::from_str(&content).map_err(|e| DeviceError::Parse(e.to_string()))?;
        let name = config
            .name
            .clone()
            .unwrap_or_else(|| path.display().to_string());
        Self::from_config(name, config)
    }

    /// Build the entry table from parsed configuration
    pub fn from_config(name: impl Into<String>, config: DeviceConfig) -> Result<Self, DeviceError> {
        if config.entries.len() > MAX_TABLE_LEN {
            return Err(DeviceError::TooManyEntries(config.entries.len()));
        }
        let mut entries = Vec::with_capacity(config.entries.len());
        for entry in &config.entries {
            entries.push(entry.to_entry()?);
        }
        // The length cap was checked above, so construction cannot fail.
        let table = KeyEntryTable::new(entries)
            .ok_or_else(|| DeviceError::TooManyEntries(config.entries.len()))?;
        Ok(Self::new(name, KeymapEngine::new(table)))
    }

    pub fn engine(&self) -> &KeymapEngine {
        &self.engine
    }
}

impl KeymapDevice for TableDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn keymap_entry(&self, record: &mut KeymapRecord) -> Result<(), MapError> {
        let info = self.engine.get(record.locator()?)?;
        record.fill_entry(&info);
        Ok(())
    }

    fn set_keymap_entry(&mut self, record: &KeymapRecord) -> Result<u32, MapError> {
        let locator = record.locator()?;
        self.engine
            .set(locator, record.scancode_bytes()?, record.keycode)
    }
}

/// Root structure of a device table YAML file
#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub entries: Vec<EntryConfig>,
}

/// A single entry from YAML
#[derive(Debug, Deserialize)]
pub struct EntryConfig {
    /// Hex scancode in display order (most-significant byte first)
    pub scancode: String,
    /// Symbolic key name or integer keycode
    pub keycode: KeycodeSpec,
    /// `key` (default) or `ignore`
    #[serde(default, rename = "type")]
    pub entry_type: Option<String>,
}

/// A keycode given either numerically or by name
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum KeycodeSpec {
    Code(u32),
    Name(String),
}

impl EntryConfig {
    fn to_entry(&self) -> Result<KeyEntry, DeviceError> {
        let scancode = Scancode::from_hex(&self.scancode)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| DeviceError::InvalidScancode(self.scancode.clone()))?;
        let keycode = match &self.keycode {
            KeycodeSpec::Code(code) => *code,
            KeycodeSpec::Name(name) => {
                names::key_by_name(name).ok_or_else(|| DeviceError::UnknownKey(name.clone()))?
            }
        };
        let entry_type = match self.entry_type.as_deref() {
            None | Some("key") => EntryType::Key,
            Some("ignore") => EntryType::Ignored,
            Some(other) => return Err(DeviceError::InvalidType(other.to_string())),
        };
        Ok(KeyEntry::new(entry_type, scancode, keycode))
    }
}

/// Errors that can occur when loading a device table
#[derive(Debug, Clone)]
pub enum DeviceError {
    Io(String),
    Parse(String),
    InvalidScancode(String),
    UnknownKey(String),
    InvalidType(String),
    TooManyEntries(usize),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Io(e) => write!(f, "IO error: {}", e),
            DeviceError::Parse(e) => write!(f, "Parse error: {}", e),
            DeviceError::InvalidScancode(s) => write!(f, "Invalid scancode: {}", s),
            DeviceError::UnknownKey(k) => write!(f, "Unknown key: {}", k),
            DeviceError::InvalidType(t) => write!(f, "Invalid entry type: {}", t),
            DeviceError::TooManyEntries(n) => {
                write!(f, "Table too large: {} entries (max 65536)", n)
            }
        }
    }
}

impl std::error::Error for DeviceError {}
