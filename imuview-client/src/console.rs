//! Line-oriented control from stdin, standing in for the connect button,
//! the preset buttons and the clear button.

use std::io::BufRead;
use std::str::FromStr;

use imuview_core::PRESETS;
use tokio::sync::mpsc;
use tokio_graceful_shutdown::SubsystemHandle;

use crate::error::ClientError;
use crate::sender::CommandSender;
use crate::session::Session;

const HELP: &str = "commands: connect <host> | disconnect | preset <1-6> | clear | status | presets | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Connect(String),
    Disconnect,
    /// Zero-based index into the preset table
    Preset(usize),
    Clear,
    Status,
    Presets,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words.next().unwrap_or("").to_ascii_lowercase();
        let arg = words.next();

        match (command.as_str(), arg) {
            ("connect", Some(host)) => Ok(ConsoleCommand::Connect(host.to_string())),
            // Same as an empty address field
            ("connect", None) => Err(ClientError::EmptyHost),
            ("disconnect", _) => Ok(ConsoleCommand::Disconnect),
            ("preset", Some(n)) => match n.parse::<usize>() {
                Ok(n) if (1..=PRESETS.len()).contains(&n) => Ok(ConsoleCommand::Preset(n - 1)),
                _ => Err(ClientError::UnknownCommand(s.trim().to_string())),
            },
            ("clear", _) => Ok(ConsoleCommand::Clear),
            ("status", _) => Ok(ConsoleCommand::Status),
            ("presets", _) => Ok(ConsoleCommand::Presets),
            ("help" | "?", _) => Ok(ConsoleCommand::Help),
            ("quit" | "exit", _) => Ok(ConsoleCommand::Quit),
            _ => Err(ClientError::UnknownCommand(s.trim().to_string())),
        }
    }
}

pub struct Console {
    session: Session,
    sender: CommandSender,
}

impl Console {
    pub fn new(session: Session) -> Self {
        let sender = CommandSender::new(session.clone());
        Console { session, sender }
    }

    pub async fn run(self, subsys: SubsystemHandle) -> Result<(), ClientError> {
        // A plain thread rather than tokio's stdin, whose blocking read would
        // hold up runtime shutdown until the next Enter.
        let (tx, mut rx) = mpsc::channel::<String>(16);
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        log::warn!("Console: cannot read stdin: {}", e);
                        break;
                    }
                }
            }
        });
        log::info!("{}", HELP);

        loop {
            tokio::select! {
                _ = subsys.on_shutdown_requested() => {
                    log::debug!("Console: shutdown");
                    return Ok(());
                },

                r = rx.recv() => {
                    match r {
                        Some(line) if line.trim().is_empty() => {},
                        Some(line) => {
                            if self.handle(&line).await {
                                subsys.request_shutdown();
                            }
                        },
                        None => {
                            log::debug!("Console: stdin closed");
                            return Ok(());
                        },
                    }
                },
            }
        }
    }

    /// Execute one input line. Returns `true` when the user asked to quit.
    pub async fn handle(&self, line: &str) -> bool {
        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(ClientError::EmptyHost) => {
                self.session.set_status(ClientError::EmptyHost.to_string());
                log::warn!("{}", ClientError::EmptyHost);
                return false;
            }
            Err(e) => {
                log::warn!("{}", e);
                return false;
            }
        };

        // Failures are already in the status text; log them for the terminal
        let result = match command {
            ConsoleCommand::Connect(host) => self.session.connect(&host).await,
            ConsoleCommand::Disconnect => {
                self.session.disconnect().await;
                Ok(())
            }
            ConsoleCommand::Preset(index) => {
                self.sender.send_preset_index(index).await.map(|_| ())
            }
            ConsoleCommand::Clear => self.sender.send_clear().await,
            ConsoleCommand::Status => {
                log::info!("{}", self.session.status());
                Ok(())
            }
            ConsoleCommand::Presets => {
                for (i, p) in PRESETS.iter().enumerate() {
                    log::info!(
                        "{}: {} (X {:.1}, Y {:.1}, Z {:.1})",
                        i + 1,
                        p.name,
                        p.target.x,
                        p.target.y,
                        p.target.z
                    );
                }
                Ok(())
            }
            ConsoleCommand::Help => {
                log::info!("{}", HELP);
                Ok(())
            }
            ConsoleCommand::Quit => return true,
        };
        if let Err(e) = result {
            log::warn!("{}", e);
        }
        false
    }
}
