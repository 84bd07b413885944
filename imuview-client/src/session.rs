//! Connection session and shared visualization state.
//!
//! A [`Session`] is cheap to clone; all clones see the same state, the same
//! socket and the same clock. The receive loop is the only writer of decoded
//! sensor data, while the display and the command sender read snapshots and
//! update the status text.

use std::io;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use imuview_core::history::Series;
use imuview_core::{
    ConnectionState, Orientation, Sample, SensorEvent, StateSnapshot, VisualizationState,
};
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_graceful_shutdown::SubsystemHandle;
use tokio_util::sync::CancellationToken;

use crate::config::SessionConfig;
use crate::error::ClientError;
use crate::receiver::{Receiver, StopReason};

pub struct SessionInner {
    pub state: VisualizationState,
    pub host: Option<String>,
    /// Bumped on every successful connect and every disconnect; receive
    /// loops compare against it before touching the state
    generation: u64,
}

/// Write half of the open socket, tagged with the connection it belongs to
struct Link {
    generation: u64,
    writer: OwnedWriteHalf,
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionInner>>,
    link: Arc<tokio::sync::Mutex<Option<Link>>>,
    cancel: Arc<Mutex<Option<CancellationToken>>>,
    config: Arc<SessionConfig>,
    started: Instant,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let stale_after_ms = config.stale_after.as_millis() as u64;
        Session {
            inner: Arc::new(RwLock::new(SessionInner {
                state: VisualizationState::with_stale_timeout(stale_after_ms),
                host: None,
                generation: 0,
            })),
            link: Arc::new(tokio::sync::Mutex::new(None)),
            cancel: Arc::new(Mutex::new(None)),
            config: Arc::new(config),
            started: Instant::now(),
        }
    }

    // A panicking reader must not take the display down with it, so
    // poisoned locks are recovered.
    pub fn read(&self) -> RwLockReadGuard<'_, SessionInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, SessionInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Milliseconds since the session was created
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Seconds since the session was created, the plot's time axis
    pub fn now_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn set_status(&self, status: impl Into<String>) {
        self.write().state.set_status(status);
    }

    /// Connect to `host` on the configured port
    pub async fn connect(&self, host: &str) -> Result<(), ClientError> {
        self.connect_to(host, self.config.port).await
    }

    /// Open the TCP connection to `host:port` and start the receive loop.
    ///
    /// Only one connection may be open or in progress at a time. Failures
    /// leave the session disconnected with a "Connection failed" status.
    pub async fn connect_to(&self, host: &str, port: u16) -> Result<(), ClientError> {
        let host = host.trim().to_string();
        if host.is_empty() {
            let e = ClientError::EmptyHost;
            self.set_status(e.to_string());
            return Err(e);
        }

        {
            let now = self.now_ms();
            let mut inner = self.write();
            if !inner.state.connection_mut().start_connecting(now) {
                return Err(ClientError::AlreadyConnected);
            }
            inner.state.set_status(format!("Connecting to {}", host));
        }
        log::info!("Connecting to {}:{}", host, port);

        let stream = match timeout(
            self.config.connect_timeout,
            TcpStream::connect((host.as_str(), port)),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(self.connect_failed(&host, ClientError::Connect(e))),
            Err(_) => {
                let secs = self.config.connect_timeout.as_secs();
                return Err(self.connect_failed(&host, ClientError::ConnectTimeout(secs)));
            }
        };
        if let Err(e) = stream.set_nodelay(true) {
            log::debug!("{}: cannot set TCP_NODELAY: {}", host, e);
        }
        let (reader, writer) = stream.into_split();

        let generation = {
            let now = self.now_ms();
            let mut inner = self.write();
            if !inner.state.connection().is_connecting() {
                // disconnect() won the race while we were still connecting
                log::info!("{}: connect abandoned", host);
                return Err(ClientError::NotConnected);
            }
            inner.generation += 1;
            inner.state.connection_mut().connected(now);
            inner.state.set_status(format!("Connected to {}", host));
            inner.host = Some(host.clone());
            inner.generation
        };

        *self.link.lock().await = Some(Link { generation, writer });
        let token = CancellationToken::new();
        if let Some(old) = self
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone())
        {
            old.cancel();
        }

        log::info!("Connected to {}:{}", host, port);

        let receiver = Receiver::new(self.clone(), reader, token, generation);
        tokio::spawn(receiver.run());
        Ok(())
    }

    fn connect_failed(&self, host: &str, e: ClientError) -> ClientError {
        log::warn!("{}: connection failed: {}", host, e);
        let now = self.now_ms();
        let mut inner = self.write();
        inner.state.connection_mut().disconnected(now);
        inner.state.set_status(format!("Connection failed: {}", e));
        e
    }

    /// Close the connection, if any. Safe to call in any state.
    pub async fn disconnect(&self) {
        if let Some(token) = self
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            token.cancel();
        }
        // A send blocked on a full socket buffer holds the link; the cancelled
        // token above makes it give the lock up.
        self.link.lock().await.take();

        let now = self.now_ms();
        let mut inner = self.write();
        inner.generation += 1;
        if inner.state.connection().state() != ConnectionState::Disconnected {
            log::info!(
                "Disconnected from {}",
                inner.host.as_deref().unwrap_or("sensor")
            );
            inner.state.connection_mut().disconnected(now);
            inner.state.set_status("Disconnected");
        }
        inner.host = None;
    }

    /// Write one complete command line to the sensor.
    ///
    /// Gives up with `NotConnected` as soon as the session is disconnected,
    /// and with a `Send` error when the sensor stops accepting data for
    /// longer than the write timeout.
    pub async fn send_line(&self, line: &str) -> Result<(), ClientError> {
        if !self.read().state.connection().can_send() {
            return Err(ClientError::NotConnected);
        }
        let cancel = self
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ClientError::NotConnected)?;

        let write = async {
            let mut link = self.link.lock().await;
            let link = link.as_mut().ok_or(ClientError::NotConnected)?;

            log::trace!("sending {:?}", line);
            link.writer
                .write_all(line.as_bytes())
                .await
                .map_err(ClientError::Send)?;
            link.writer.flush().await.map_err(ClientError::Send)
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(ClientError::NotConnected),
            r = timeout(self.config.write_timeout, write) => match r {
                Ok(r) => r,
                Err(_) => Err(ClientError::Send(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!(
                        "sensor not accepting data for {} seconds",
                        self.config.write_timeout.as_secs()
                    ),
                ))),
            },
        }
    }

    /// Fold a batch of decoded events into the state, on behalf of the
    /// receive loop of connection `generation`
    pub(crate) fn apply_events(&self, generation: u64, events: Vec<SensorEvent>) {
        let now = self.now_ms();
        let mut inner = self.write();
        if inner.generation != generation {
            return;
        }
        let was_stale = inner.state.connection_state(now) == ConnectionState::Stale;
        inner.state.apply_all(events, now);
        let state = inner.state.connection_state(now);
        if was_stale && state == ConnectionState::Connected {
            log::info!("Signal restored");
        }
        Self::report_stale(&mut inner.state, now);
    }

    /// Periodic check from the receive loop, so silence is noticed even
    /// when no bytes arrive
    pub(crate) fn check_stale(&self, generation: u64) {
        let now = self.now_ms();
        let mut inner = self.write();
        if inner.generation == generation {
            Self::report_stale(&mut inner.state, now);
        }
    }

    fn report_stale(state: &mut VisualizationState, now: u64) {
        if state.connection_mut().check_stale(now) {
            log::warn!(
                "Signal lost: no angle report for {} ms",
                state.connection().time_since_update_ms(now)
            );
        }
    }

    /// Called once when a receive loop exits
    pub(crate) async fn receiver_stopped(&self, generation: u64, reason: StopReason) {
        if let StopReason::Cancelled = reason {
            log::debug!("receive loop {} cancelled", generation);
            return;
        }

        {
            let mut link = self.link.lock().await;
            if link.as_ref().map(|l| l.generation) == Some(generation) {
                link.take();
            }
        }

        let now = self.now_ms();
        let mut inner = self.write();
        if inner.generation != generation {
            return;
        }
        let host = inner.host.take().unwrap_or_else(|| "sensor".to_string());
        let status = match reason {
            StopReason::Cancelled => return,
            StopReason::Closed => {
                log::info!("{}: connection closed by sensor", host);
                "Disconnected".to_string()
            }
            StopReason::TimedOut => {
                log::warn!(
                    "{}: no data for {} seconds, dropping connection",
                    host,
                    self.config.read_timeout.as_secs()
                );
                "Disconnected".to_string()
            }
            StopReason::Failed(e) => {
                log::error!("{}: socket error: {}", host, e);
                format!("Socket error: {}", e)
            }
        };
        inner.state.connection_mut().disconnected(now);
        inner.state.set_status(status);
    }

    /// Record the current orientation in the plot history, stamped with
    /// the session clock
    pub fn sample_history(&self) {
        self.sample_history_at(self.now_secs());
    }

    /// Record the current orientation with an explicit timestamp in seconds
    pub fn sample_history_at(&self, time_secs: f64) {
        self.write().state.sample(time_secs);
    }

    pub fn orientation(&self) -> Orientation {
        self.read().state.orientation()
    }

    pub fn preset(&self) -> Option<Orientation> {
        self.read().state.preset()
    }

    pub fn set_preset(&self, preset: Option<Orientation>) {
        self.write().state.set_preset(preset);
    }

    pub fn history(&self) -> Vec<Sample> {
        self.read().state.history().to_vec()
    }

    pub fn history_series(&self) -> Series {
        self.read().state.history().series()
    }

    pub fn connection_state(&self) -> ConnectionState {
        let now = self.now_ms();
        self.read().state.connection_state(now)
    }

    pub fn status(&self) -> String {
        self.read().state.status().to_string()
    }

    pub fn host(&self) -> Option<String> {
        self.read().host.clone()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let now = self.now_ms();
        self.read().state.snapshot(now)
    }

    /// Subsystem that owns the connection for the lifetime of the program:
    /// connects to `host` if given and disconnects on shutdown
    pub async fn run(
        self,
        host: Option<String>,
        subsys: SubsystemHandle,
    ) -> Result<(), ClientError> {
        if let Some(host) = host {
            tokio::select! {
                _ = subsys.on_shutdown_requested() => {
                    self.disconnect().await;
                    return Ok(());
                }
                r = self.connect(&host) => {
                    // Failure is reported in the status; the user can retry
                    // from the console.
                    if let Err(e) = r {
                        log::debug!("initial connect to {} failed: {}", host, e);
                    }
                }
            }
        }

        subsys.on_shutdown_requested().await;
        log::info!("Session: shutdown");
        self.disconnect().await;
        Ok(())
    }
}
