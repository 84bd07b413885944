//! Preset and clear commands, sent over the session's socket.

use imuview_core::protocol::{format_clear_command, format_preset_command};
use imuview_core::{preset_by_index, NamedPreset, Orientation};

use crate::error::ClientError;
use crate::session::Session;

#[derive(Clone)]
pub struct CommandSender {
    session: Session,
}

impl CommandSender {
    pub fn new(session: Session) -> Self {
        CommandSender { session }
    }

    /// Send a target orientation.
    ///
    /// On success the local preset is set right away, without waiting for
    /// the sensor to echo it back.
    pub async fn send_preset(&self, x: f64, y: f64, z: f64) -> Result<(), ClientError> {
        let label = format!("({:.2}, {:.2}, {:.2})", x, y, z);
        self.send_target(&label, Orientation::new(x, y, z)).await
    }

    /// Send one of the built-in presets by zero-based index
    pub async fn send_preset_index(
        &self,
        index: usize,
    ) -> Result<&'static NamedPreset, ClientError> {
        let preset = preset_by_index(index).ok_or(ClientError::UnknownPreset(index))?;
        self.send_target(preset.name, preset.target).await?;
        Ok(preset)
    }

    async fn send_target(&self, label: &str, target: Orientation) -> Result<(), ClientError> {
        let command = format_preset_command(target.x, target.y, target.z);
        match self.session.send_line(&command).await {
            Ok(()) => {
                let host = self.host();
                log::info!("Sent preset {} to {}", label, host);
                let mut inner = self.session.write();
                inner.state.set_preset(Some(target));
                inner.state.set_status(format!("Sent preset {} to {}", label, host));
                Ok(())
            }
            Err(e) => Err(self.failed("preset", e)),
        }
    }

    /// Ask the sensor to drop its target. Like [`send_preset`](Self::send_preset)
    /// the local preset is cleared without waiting for the echo.
    pub async fn send_clear(&self) -> Result<(), ClientError> {
        match self.session.send_line(&format_clear_command()).await {
            Ok(()) => {
                let host = self.host();
                log::info!("Sent clear command to {}", host);
                let mut inner = self.session.write();
                inner.state.set_preset(None);
                inner.state.set_status(format!("Sent clear command to {}", host));
                Ok(())
            }
            Err(e) => Err(self.failed("clear", e)),
        }
    }

    fn host(&self) -> String {
        self.session.host().unwrap_or_else(|| "sensor".to_string())
    }

    fn failed(&self, what: &str, e: ClientError) -> ClientError {
        match e {
            ClientError::NotConnected => {
                log::warn!("Cannot send {}: not connected", what);
                self.session.set_status(e.to_string());
            }
            _ => {
                log::error!("Error sending {}: {}", what, e);
                self.session
                    .set_status(format!("Error sending {}: {}", what, e));
            }
        }
        e
    }
}
