use std::io;

use imuview_core::LineDecoder;
use tokio::io::AsyncReadExt;
use tokio::net::tcp::OwnedReadHalf;
use tokio::time::{interval, timeout_at, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::is_disconnect;
use crate::session::Session;

/// Why a receive loop ended
#[derive(Debug)]
pub(crate) enum StopReason {
    /// `Session::disconnect` was called
    Cancelled,
    /// Orderly close or reset by the sensor
    Closed,
    /// Nothing arrived within the read timeout
    TimedOut,
    Failed(io::Error),
}

/// Reads the socket of one connection and feeds decoded reports into the
/// session until the connection ends.
pub(crate) struct Receiver {
    session: Session,
    reader: OwnedReadHalf,
    decoder: LineDecoder,
    cancel: CancellationToken,
    generation: u64,
}

impl Receiver {
    pub fn new(
        session: Session,
        reader: OwnedReadHalf,
        cancel: CancellationToken,
        generation: u64,
    ) -> Self {
        Receiver {
            session,
            reader,
            decoder: LineDecoder::new(),
            cancel,
            generation,
        }
    }

    pub async fn run(mut self) {
        log::debug!("receive loop {} starting", self.generation);

        let config = self.session.config().clone();
        let mut buf = vec![0u8; config.chunk_size];

        // Check twice per stale period so a silent sensor is flagged promptly
        let mut stale_check = interval((config.stale_after / 2).max(Duration::from_millis(10)));
        stale_check.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut deadline = Instant::now() + config.read_timeout;

        let reason = loop {
            let read = tokio::select! {
                _ = self.cancel.cancelled() => break StopReason::Cancelled,
                _ = stale_check.tick() => {
                    self.session.check_stale(self.generation);
                    continue;
                },
                r = timeout_at(deadline, self.reader.read(&mut buf)) => r,
            };

            match read {
                Err(_) => break StopReason::TimedOut,
                Ok(Ok(0)) => break StopReason::Closed,
                Ok(Ok(len)) => {
                    log::trace!("received {} bytes", len);
                    deadline = Instant::now() + config.read_timeout;
                    let events = self.decoder.feed(&buf[..len]);
                    if !events.is_empty() {
                        self.session.apply_events(self.generation, events);
                    }
                }
                Ok(Err(e)) if is_disconnect(&e) => break StopReason::Closed,
                Ok(Err(e)) => break StopReason::Failed(e),
            }
        };

        if self.decoder.pending_len() > 0 {
            log::debug!(
                "dropping {} bytes of unterminated input",
                self.decoder.pending_len()
            );
        }
        self.session.receiver_stopped(self.generation, reason).await;
    }
}
