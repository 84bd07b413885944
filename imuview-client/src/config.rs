//! Runtime settings, derived from the command line.

use std::time::Duration;

use imuview_core::connection::STALE_TIMEOUT_MS;
use imuview_core::protocol::{READ_CHUNK_SIZE, SENSOR_PORT};

use crate::Cli;

/// Socket and timing settings for a [`Session`](crate::Session)
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub port: u16,
    pub connect_timeout: Duration,
    /// A read that delivers nothing for this long drops the connection
    pub read_timeout: Duration,
    /// Longest a command write may block on a sensor that stopped reading
    pub write_timeout: Duration,
    /// Silence after which the signal is reported as lost
    pub stale_after: Duration,
    pub chunk_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            port: SENSOR_PORT,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(10),
            stale_after: Duration::from_millis(STALE_TIMEOUT_MS),
            chunk_size: READ_CHUNK_SIZE,
        }
    }
}

impl From<&Cli> for SessionConfig {
    fn from(args: &Cli) -> Self {
        SessionConfig {
            port: args.port,
            ..Default::default()
        }
    }
}

/// Refresh rates of the display
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Cube transform and history sampling
    pub frame_interval: Duration,
    /// Plot and label redraw
    pub plot_interval: Duration,
    /// Print a JSON snapshot per plot refresh instead of the status line
    pub output: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            frame_interval: Duration::from_millis(50),
            plot_interval: Duration::from_millis(200),
            output: false,
        }
    }
}

impl From<&Cli> for DisplayConfig {
    fn from(args: &Cli) -> Self {
        DisplayConfig {
            output: args.output,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_from_cli() {
        let args = Cli::parse_from(["imuview"]);
        let session = SessionConfig::from(&args);
        assert_eq!(session.port, 1234);
        assert_eq!(session.connect_timeout, Duration::from_secs(10));
        assert_eq!(session.write_timeout, Duration::from_secs(10));
        assert_eq!(session.stale_after, Duration::from_secs(2));
        assert_eq!(session.chunk_size, 1024);

        let display = DisplayConfig::from(&args);
        assert_eq!(display.frame_interval, Duration::from_millis(50));
        assert_eq!(display.plot_interval, Duration::from_millis(200));
        assert!(!display.output);
    }

    #[test]
    fn test_cli_overrides() {
        let args = Cli::parse_from(["imuview", "--host", "192.168.4.1", "-p", "4321", "--output"]);
        assert_eq!(args.host.as_deref(), Some("192.168.4.1"));
        assert_eq!(SessionConfig::from(&args).port, 4321);
        assert!(DisplayConfig::from(&args).output);
    }
}
