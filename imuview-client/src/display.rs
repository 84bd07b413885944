//! Terminal rendering of the session state.
//!
//! Two timers drive the display, mirroring the two refresh rates of the
//! viewer: a fast frame tick that samples the history and recomputes the
//! cube transforms, and a slower plot tick that redraws the text.

use std::io::Write;

use imuview_core::geometry::{rotation, transformed_vertices};
use imuview_core::history::Series;
use imuview_core::{ConnectionState, Orientation, StateSnapshot};
use nalgebra::Point3;
use tokio::time::{interval, MissedTickBehavior};
use tokio_graceful_shutdown::SubsystemHandle;

use crate::config::DisplayConfig;
use crate::error::ClientError;
use crate::session::Session;

/// Cube corners for the live orientation and, if set, the preset overlay
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub live: Option<[Point3<f64>; 8]>,
    pub overlay: Option<[Point3<f64>; 8]>,
}

impl Scene {
    pub fn update(&mut self, orientation: Orientation, preset: Option<Orientation>) {
        self.live = Some(transformed_vertices(&rotation(
            orientation.x,
            orientation.y,
            orientation.z,
        )));
        self.overlay = preset.map(|p| transformed_vertices(&rotation(p.x, p.y, p.z)));
    }
}

pub struct Display {
    session: Session,
    config: DisplayConfig,
    scene: Scene,
}

impl Display {
    pub fn new(session: Session, config: DisplayConfig) -> Self {
        Display {
            session,
            config,
            scene: Scene::default(),
        }
    }

    pub async fn run(mut self, subsys: SubsystemHandle) -> Result<(), ClientError> {
        log::debug!(
            "Display: frame every {:?}, plot every {:?}",
            self.config.frame_interval,
            self.config.plot_interval
        );

        let mut frame = interval(self.config.frame_interval);
        frame.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut plot = interval(self.config.plot_interval);
        plot.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = subsys.on_shutdown_requested() => {
                    log::info!("Display: shutdown");
                    if !self.config.output {
                        println!();
                    }
                    return Ok(());
                },

                _ = frame.tick() => {
                    self.on_frame();
                },

                _ = plot.tick() => {
                    self.on_plot()?;
                },
            }
        }
    }

    fn on_frame(&mut self) {
        self.session.sample_history();
        let (orientation, preset) = (self.session.orientation(), self.session.preset());
        self.scene.update(orientation, preset);

        if log::log_enabled!(log::Level::Trace) {
            if let Some(live) = &self.scene.live {
                log::trace!("live cube corner: {:?}", live[6]);
            }
        }
    }

    fn on_plot(&mut self) -> Result<(), ClientError> {
        let snapshot = self.session.snapshot();
        let mut stdout = std::io::stdout().lock();

        if self.config.output {
            match serde_json::to_string(&snapshot) {
                Ok(json) => writeln!(stdout, "{}", json)?,
                Err(e) => log::error!("cannot serialize snapshot: {}", e),
            }
        } else {
            let line = status_line(&snapshot, &self.session.history_series());
            // Overwrite the previous line in place
            write!(stdout, "\r\x1b[2K{}", line)?;
        }
        stdout.flush()?;
        Ok(())
    }
}

pub fn signal_text(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Connected => "Signal: OK",
        ConnectionState::Stale => "Signal: Lost",
        ConnectionState::Connecting | ConnectionState::Disconnected => "Signal: --",
    }
}

pub fn current_text(orientation: Orientation) -> String {
    format!(
        "Current: X: {:.2}° Y: {:.2}° Z: {:.2}°",
        orientation.x, orientation.y, orientation.z
    )
}

pub fn preset_text(preset: Option<Orientation>) -> String {
    match preset {
        Some(p) => format!("Preset: X: {:.2}° Y: {:.2}° Z: {:.2}°", p.x, p.y, p.z),
        None => "Preset: X: --° Y: --° Z: --°".to_string(),
    }
}

/// One-line summary of the plot window: span and per-axis range
pub fn plot_text(series: &Series) -> String {
    let (Some(first), Some(last)) = (series.time.first(), series.time.last()) else {
        return "Plot: empty".to_string();
    };
    let range = |v: &[f64]| {
        let min = v.iter().copied().fold(f64::INFINITY, f64::min);
        let max = v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        format!("{:.0}..{:.0}", min, max)
    };
    format!(
        "Plot: {} samples / {:.1}s X {} Y {} Z {}",
        series.time.len(),
        last - first,
        range(&series.x),
        range(&series.y),
        range(&series.z)
    )
}

pub fn status_line(snapshot: &StateSnapshot, series: &Series) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        signal_text(snapshot.connection),
        current_text(snapshot.orientation),
        preset_text(snapshot.preset),
        plot_text(series),
        snapshot.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use imuview_core::{History, Sample};

    #[test]
    fn test_signal_text() {
        assert_eq!(signal_text(ConnectionState::Connected), "Signal: OK");
        assert_eq!(signal_text(ConnectionState::Stale), "Signal: Lost");
        assert_eq!(signal_text(ConnectionState::Disconnected), "Signal: --");
    }

    #[test]
    fn test_angle_labels() {
        assert_eq!(
            current_text(Orientation::new(10.0, -20.5, 179.999)),
            "Current: X: 10.00° Y: -20.50° Z: 180.00°"
        );
        assert_eq!(preset_text(None), "Preset: X: --° Y: --° Z: --°");
        assert_eq!(
            preset_text(Some(Orientation::new(17.2, 1.7, -75.0))),
            "Preset: X: 17.20° Y: 1.70° Z: -75.00°"
        );
    }

    #[test]
    fn test_plot_text() {
        assert_eq!(plot_text(&History::default().series()), "Plot: empty");

        let mut history = History::default();
        history.push(Sample::new(1.0, Orientation::new(-10.0, 0.0, 5.0)));
        history.push(Sample::new(1.5, Orientation::new(20.0, 0.0, -5.0)));
        assert_eq!(
            plot_text(&history.series()),
            "Plot: 2 samples / 0.5s X -10..20 Y 0..0 Z -5..5"
        );
    }

    #[test]
    fn test_scene_overlay_follows_preset() {
        let mut scene = Scene::default();
        scene.update(Orientation::default(), None);
        assert!(scene.overlay.is_none());
        let live = scene.live.unwrap();
        assert_eq!(live[6], Point3::new(50.0, 50.0, 50.0));

        scene.update(Orientation::default(), Some(Orientation::new(0.0, 0.0, 90.0)));
        let overlay = scene.overlay.unwrap();
        // (50, 50, 50) rotated 90° about Z
        assert!((overlay[6] - Point3::new(-50.0, 50.0, 50.0)).norm() < 1e-9);
    }
}
