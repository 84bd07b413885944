use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Connect(#[source] io::Error),
    #[error("timed out after {0} seconds")]
    ConnectTimeout(u64),
    #[error("Please enter an IP address.")]
    EmptyHost,
    #[error("A connection is already open or in progress")]
    AlreadyConnected,
    #[error("Not connected to sensor.")]
    NotConnected,
    #[error("{0}")]
    Send(#[source] io::Error),
    #[error("No preset number {0}")]
    UnknownPreset(usize),
    #[error("Unknown command '{0}', try 'help'")]
    UnknownCommand(String),
    #[error("I/O operation failed")]
    Io(#[from] io::Error),
}

impl ClientError {
    /// Whether the error means the sensor link is gone, rather than a local
    /// mistake the user can correct
    pub fn is_connection_lost(&self) -> bool {
        match self {
            ClientError::Io(e) | ClientError::Send(e) => is_disconnect(e),
            _ => false,
        }
    }
}

/// I/O errors that mean the peer went away, as opposed to a local failure
pub fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_status_text() {
        assert_eq!(ClientError::EmptyHost.to_string(), "Please enter an IP address.");
        assert_eq!(ClientError::NotConnected.to_string(), "Not connected to sensor.");
        assert_eq!(
            ClientError::ConnectTimeout(10).to_string(),
            "timed out after 10 seconds"
        );
    }

    #[test]
    fn test_connection_lost() {
        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        assert!(ClientError::Send(reset).is_connection_lost());

        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(!ClientError::Io(denied).is_connection_lost());
        assert!(!ClientError::NotConnected.is_connection_lost());
    }
}
