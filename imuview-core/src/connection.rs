//! Connection state machine for the sensor link.
//!
//! Pure state transitions, no I/O. The session in `imuview-client` drives it
//! with timestamps in milliseconds since an arbitrary, session-wide epoch.
//!
//! ```text
//!  Disconnected ──start_connecting──▶ Connecting ──connected──▶ Connected
//!       ▲                                 │                     │    ▲
//!       │                                 │ failed         >2 s │    │ angle update
//!       └──────── disconnected ◀──────────┴───────────────── Stale ──┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use imuview_core::connection::{ConnectionManager, ConnectionState};
//!
//! let mut conn = ConnectionManager::new();
//! assert!(conn.start_connecting(0));
//! conn.connected(100);
//! assert_eq!(conn.state_at(1000), ConnectionState::Connected);
//! assert_eq!(conn.state_at(2200), ConnectionState::Stale);
//! conn.angle_received(2300);
//! assert_eq!(conn.state_at(2300), ConnectionState::Connected);
//! ```

use serde::{Deserialize, Serialize};

/// Silence after which a connected sensor is shown as stale
pub const STALE_TIMEOUT_MS: u64 = 2000;

// =============================================================================
// Connection State
// =============================================================================

/// Lifecycle of the TCP connection to the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// No socket
    #[default]
    Disconnected,
    /// TCP connect in progress
    Connecting,
    /// Socket open and angle updates arriving
    Connected,
    /// Socket open but no angle update within the stale timeout
    Stale,
}

impl ConnectionState {
    /// Check if the socket is open, so commands can be sent
    pub fn can_send(&self) -> bool {
        matches!(self, ConnectionState::Connected | ConnectionState::Stale)
    }

    pub fn is_connecting(&self) -> bool {
        *self == ConnectionState::Connecting
    }

    /// The "Signal" indicator; only meaningful while the socket is open
    pub fn signal_ok(&self) -> bool {
        *self == ConnectionState::Connected
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::Stale => write!(f, "Stale"),
        }
    }
}

// =============================================================================
// Connection Manager
// =============================================================================

/// Tracks connection state and angle update freshness.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    state: ConnectionState,
    /// Timestamp of last state change
    last_state_change_ms: u64,
    /// Timestamp of the last valid angle update (or of connecting)
    last_update_ms: u64,
    stale_after_ms: u64,
    /// Whether any angle update arrived on this connection
    has_received_data: bool,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionManager {
    /// Create a manager in disconnected state with the standard stale timeout.
    pub fn new() -> Self {
        Self::with_stale_timeout(STALE_TIMEOUT_MS)
    }

    pub fn with_stale_timeout(stale_after_ms: u64) -> Self {
        ConnectionManager {
            state: ConnectionState::Disconnected,
            last_state_change_ms: 0,
            last_update_ms: 0,
            stale_after_ms,
            has_received_data: false,
        }
    }

    /// Last recorded state, without applying the stale timeout.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// State as it should be displayed at `current_time_ms`.
    ///
    /// Stale is derived from elapsed time, so it is reported even when no
    /// bytes at all arrive to trigger [`check_stale`](Self::check_stale).
    pub fn state_at(&self, current_time_ms: u64) -> ConnectionState {
        if self.state == ConnectionState::Connected
            && self.time_since_update_ms(current_time_ms) > self.stale_after_ms
        {
            ConnectionState::Stale
        } else {
            self.state
        }
    }

    pub fn stale_after_ms(&self) -> u64 {
        self.stale_after_ms
    }

    pub fn has_received_data(&self) -> bool {
        self.has_received_data
    }

    pub fn can_send(&self) -> bool {
        self.state.can_send()
    }

    pub fn is_connecting(&self) -> bool {
        self.state.is_connecting()
    }

    pub fn time_in_state_ms(&self, current_time_ms: u64) -> u64 {
        current_time_ms.saturating_sub(self.last_state_change_ms)
    }

    pub fn time_since_update_ms(&self, current_time_ms: u64) -> u64 {
        current_time_ms.saturating_sub(self.last_update_ms)
    }

    // -------------------------------------------------------------------------
    // State Transitions
    // -------------------------------------------------------------------------

    /// Begin a connection attempt.
    ///
    /// Only one attempt or session may exist at a time, so this returns
    /// `false` and changes nothing unless currently disconnected.
    pub fn start_connecting(&mut self, current_time_ms: u64) -> bool {
        if self.state != ConnectionState::Disconnected {
            return false;
        }
        self.set_state(ConnectionState::Connecting, current_time_ms);
        true
    }

    /// TCP connect succeeded. The stale clock starts now.
    pub fn connected(&mut self, current_time_ms: u64) {
        if self.state.is_connecting() {
            self.set_state(ConnectionState::Connected, current_time_ms);
            self.last_update_ms = current_time_ms;
            self.has_received_data = false;
        }
    }

    /// A valid angle update arrived; clears Stale.
    pub fn angle_received(&mut self, current_time_ms: u64) {
        if self.state.can_send() {
            self.last_update_ms = current_time_ms;
            self.has_received_data = true;
            self.set_state(ConnectionState::Connected, current_time_ms);
        }
    }

    /// Apply the stale timeout. Returns `true` when this call moved the
    /// state from Connected to Stale.
    pub fn check_stale(&mut self, current_time_ms: u64) -> bool {
        if self.state_at(current_time_ms) == ConnectionState::Stale
            && self.state == ConnectionState::Connected
        {
            self.set_state(ConnectionState::Stale, current_time_ms);
            return true;
        }
        false
    }

    /// Socket closed, failed to connect, or the user disconnected.
    pub fn disconnected(&mut self, current_time_ms: u64) {
        self.set_state(ConnectionState::Disconnected, current_time_ms);
        self.has_received_data = false;
    }

    fn set_state(&mut self, new_state: ConnectionState, current_time_ms: u64) {
        if self.state != new_state {
            self.state = new_state;
            self.last_state_change_ms = current_time_ms;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
