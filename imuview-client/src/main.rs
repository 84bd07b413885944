use std::time::Duration;

use clap::Parser;
use imuview_client::console::Console;
use imuview_client::display::Display;
use imuview_client::{Cli, DisplayConfig, Session, SessionConfig, VERSION};
use miette::{IntoDiagnostic, Result};
use tokio_graceful_shutdown::{SubsystemBuilder, Toplevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .format_timestamp_millis()
        .init();

    log::info!("imuview {} starting", VERSION);

    let session = Session::new(SessionConfig::from(&args));
    let display = Display::new(session.clone(), DisplayConfig::from(&args));
    let console = Console::new(session.clone());
    let host = args.host.clone();

    Toplevel::new(|s| async move {
        s.start(SubsystemBuilder::new("Display", move |subsys| {
            display.run(subsys)
        }));
        s.start(SubsystemBuilder::new("Console", move |subsys| {
            console.run(subsys)
        }));
        s.start(SubsystemBuilder::new("Session", move |subsys| {
            session.run(host, subsys)
        }));
    })
    .catch_signals()
    .handle_shutdown_requests(Duration::from_secs(2))
    .await
    .into_diagnostic()
}
