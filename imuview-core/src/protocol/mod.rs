//! Sensor line protocol.
//!
//! The sensor speaks newline-delimited ASCII over a single TCP stream:
//!
//! | Direction | Line                                   | Meaning                 |
//! |-----------|----------------------------------------|-------------------------|
//! | in        | `X:<f>,Y:<f>,Z:<f>`                    | current angles, [0,360) |
//! | in / out  | `PRESET:x:<f>,y:<f>,z:<f>`             | absolute target         |
//! | in / out  | `PRESET:CLEAR`                         | target removed          |
//!
//! All functions here are pure (no I/O):
//! - [`report`] - classify and parse a single inbound line
//! - [`command`] - format outbound commands
//! - [`decoder`] - reassemble lines from arbitrary socket chunks
//!
//! # Example
//!
//! ```rust
//! use imuview_core::protocol::{LineDecoder, SensorEvent};
//!
//! let mut decoder = LineDecoder::new();
//! assert!(decoder.feed(b"X:1.0,Y:2").is_empty());
//! let events = decoder.feed(b".0,Z:3.0\n");
//! assert_eq!(events.len(), 1);
//! assert!(matches!(events[0], SensorEvent::AngleUpdate(_)));
//! ```

pub mod command;
pub mod decoder;
pub mod report;

pub use command::{format_clear_command, format_preset_command};
pub use decoder::LineDecoder;
pub use report::parse_line;

use crate::state::Orientation;

/// TCP port the sensor listens on
pub const SENSOR_PORT: u16 = 1234;

/// Longest partial line kept between reads; a longer one is dropped up to
/// its terminator
pub const MAX_LINE_LENGTH: usize = 4096;

/// Maximum number of bytes requested per socket read
pub const READ_CHUNK_SIZE: usize = 1024;

/// Prefix shared by preset set and preset clear lines
pub const PRESET_PREFIX: &str = "PRESET:";

/// Full line (without newline) that clears the preset
pub const PRESET_CLEAR: &str = "PRESET:CLEAR";

/// A decoded inbound line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    /// Current orientation, already normalized to the signed range
    AngleUpdate(Orientation),
    /// Absolute preset target, as sent (not normalized)
    PresetUpdate(Orientation),
    /// Preset was removed
    PresetClear,
}
