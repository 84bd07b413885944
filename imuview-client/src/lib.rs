//! # imuview Client
//!
//! Live orientation viewer for a remote IMU sensor.
//!
//! The client opens one TCP connection to the sensor, folds the streamed
//! angle reports into shared state and renders that state on two timers.
//! Preset commands typed on the console are written back over the same
//! socket.
//!
//! ## Architecture
//!
//! Parsing and state logic come from [`imuview_core`]; this crate adds the
//! tokio runtime around it.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   imuview-client                     │
//! │  ┌────────────┐   ┌────────────┐   ┌──────────────┐  │
//! │  │ Console    │   │ Display    │   │ Receive loop │  │
//! │  │ (stdin)    │   │ (50/200ms) │   │ (TCP reads)  │  │
//! │  └─────┬──────┘   └─────┬──────┘   └──────┬───────┘  │
//! │        │ commands       │ snapshots       │ events   │
//! │        ▼                ▼                 ▼          │
//! │  ┌─────────────────────────────────────────────────┐ │
//! │  │         Session (Arc<RwLock<state>>)            │ │
//! │  └─────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example: Connecting
//!
//! ```rust,no_run
//! use imuview_client::{CommandSender, Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = Session::new(SessionConfig::default());
//!     session.connect("192.168.4.1").await.unwrap();
//!
//!     let sender = CommandSender::new(session.clone());
//!     sender.send_preset_index(0).await.unwrap();
//!
//!     println!("{:?}", session.orientation());
//!     session.disconnect().await;
//! }
//! ```
//!
//! ## Command-Line Interface
//!
//! See [`Cli`]. Key options:
//!
//! - `--host` - Sensor address to connect to at start-up
//! - `-p, --port` - Sensor TCP port (default: 1234)
//! - `-v` - Increase verbosity (use multiple times)
//! - `--output` - Print JSON state snapshots to stdout

use clap::Parser;
use imuview_core::protocol::SENSOR_PORT;

pub mod config;
pub mod console;
pub mod display;
pub mod error;
mod receiver;
pub mod sender;
pub mod session;

pub use config::{DisplayConfig, SessionConfig};
pub use error::ClientError;
pub use sender::CommandSender;
pub use session::Session;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Clone, Debug)]
#[command(version, about)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    /// Sensor address to connect to at start-up
    #[arg(long)]
    pub host: Option<String>,

    /// Sensor TCP port
    #[arg(short, long, default_value_t = SENSOR_PORT)]
    pub port: u16,

    /// Write a JSON state snapshot to stdout on every plot refresh
    #[arg(long, default_value_t = false)]
    pub output: bool,
}
