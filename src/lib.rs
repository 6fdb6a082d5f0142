//! evmap - inspect and rewrite scancode-to-keycode tables
//!
//! This crate provides the sparse keymap engine (an ordered table of
//! scancode→keycode entries with in-place mutation and a derived set of
//! actively mapped keycodes), the fixed-width wire protocol used to query
//! and edit it, and the client that drives both from the command line.

pub mod cli;
pub mod client;
pub mod device;
pub mod keymap;
pub mod names;
pub mod tracing;
pub mod wire;

// Re-export commonly used types
pub use client::{ClientError, EditOutcome};
pub use device::{DeviceError, KeymapDevice, TableDevice};
pub use keymap::{KeyEntry, KeyEntryTable, KeymapEngine, Locator, MapError, Scancode};
pub use wire::KeymapRecord;
