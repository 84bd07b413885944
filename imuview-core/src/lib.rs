//! # imuview Core
//!
//! Platform-independent protocol and state library for a remote orientation
//! sensor that streams angles over a line-based TCP protocol.
//!
//! This crate contains pure parsing and state logic with **zero I/O
//! dependencies**. Sockets, tasks and timers live in `imuview-client`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  imuview-core (no tokio/async deps)                         │
//! │  ├── protocol/   (line decoder, parsing, command format)    │
//! │  ├── state       (orientation, preset, status)              │
//! │  ├── history     (bounded plot samples)                     │
//! │  ├── connection  (state machine, stale detection)           │
//! │  └── geometry    (cube mesh and rotation)                   │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!               ┌────────────┴────────────┐
//!               │  imuview-client         │
//!               │  (tokio session, UI)    │
//!               └─────────────────────────┘
//! ```
//!
//! ## Example: Decoding a stream
//!
//! ```rust
//! use imuview_core::{LineDecoder, Orientation, VisualizationState};
//!
//! let mut state = VisualizationState::new();
//! state.connection_mut().start_connecting(0);
//! state.connection_mut().connected(0);
//!
//! let mut decoder = LineDecoder::new();
//! state.apply_all(decoder.feed(b"X:10.0,Y:20.0,Z:350.0\n"), 50);
//! assert_eq!(state.orientation(), Orientation::new(10.0, 20.0, -10.0));
//! ```

pub mod angle;
pub mod connection;
pub mod error;
pub mod geometry;
pub mod history;
pub mod presets;
pub mod protocol;
pub mod state;

// Re-export commonly used types
pub use angle::normalize;
pub use connection::{ConnectionManager, ConnectionState};
pub use error::ParseError;
pub use history::{History, Sample, HISTORY_CAPACITY};
pub use presets::{preset_by_index, NamedPreset, PRESETS};
pub use protocol::{LineDecoder, SensorEvent};
pub use state::{Orientation, StateSnapshot, VisualizationState};
