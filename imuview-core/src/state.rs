//! Visualization State Tracking
//!
//! The single piece of mutable state shared between the connection session
//! (writer) and the display timers (readers). It is updated by applying
//! decoded [`SensorEvent`]s and can be serialized for snapshot output.

use serde::{Deserialize, Serialize};

use crate::connection::{ConnectionManager, ConnectionState};
use crate::history::{History, Sample};
use crate::protocol::SensorEvent;

/// Three angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Orientation {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Orientation { x, y, z }
    }
}

/// Complete client state
///
/// The preset is an `Option` of a full triple, so a partially set preset
/// cannot be represented.
#[derive(Debug, Clone, Default)]
pub struct VisualizationState {
    orientation: Orientation,
    preset: Option<Orientation>,
    history: History,
    connection: ConnectionManager,
    status: String,
}

/// Copy of the state at one instant, for display and `--output`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub orientation: Orientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<Orientation>,
    pub connection: ConnectionState,
    pub status: String,
    pub history_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_sample: Option<Sample>,
}

impl VisualizationState {
    pub fn new() -> Self {
        VisualizationState::default()
    }

    /// State whose connection goes stale after `stale_after_ms` of silence
    pub fn with_stale_timeout(stale_after_ms: u64) -> Self {
        VisualizationState {
            connection: ConnectionManager::with_stale_timeout(stale_after_ms),
            ..Default::default()
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn preset(&self) -> Option<Orientation> {
        self.preset
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Connection state with the stale timeout applied at `current_time_ms`
    pub fn connection_state(&self, current_time_ms: u64) -> ConnectionState {
        self.connection.state_at(current_time_ms)
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut ConnectionManager {
        &mut self.connection
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Local preset change (optimistic echo of a sent command)
    pub fn set_preset(&mut self, preset: Option<Orientation>) {
        self.preset = preset;
    }

    /// Fold one decoded event into the state
    pub fn apply(&mut self, event: SensorEvent, current_time_ms: u64) {
        match event {
            SensorEvent::AngleUpdate(orientation) => {
                self.orientation = orientation;
                self.connection.angle_received(current_time_ms);
            }
            SensorEvent::PresetUpdate(preset) => {
                self.preset = Some(preset);
            }
            SensorEvent::PresetClear => {
                self.preset = None;
            }
        }
    }

    /// Apply events in the order they were decoded
    pub fn apply_all<I>(&mut self, events: I, current_time_ms: u64)
    where
        I: IntoIterator<Item = SensorEvent>,
    {
        for event in events {
            self.apply(event, current_time_ms);
        }
    }

    /// Record the current orientation in the plot history
    pub fn sample(&mut self, time_secs: f64) {
        self.history.push(Sample::new(time_secs, self.orientation));
    }

    pub fn snapshot(&self, current_time_ms: u64) -> StateSnapshot {
        StateSnapshot {
            orientation: self.orientation,
            preset: self.preset,
            connection: self.connection_state(current_time_ms),
            status: self.status.clone(),
            history_len: self.history.len(),
            latest_sample: self.history.latest().copied(),
        }
    }
}
