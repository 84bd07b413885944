//! Outbound command formatting
//!
//! Pure functions for building command lines. No I/O - just returns strings
//! (including the trailing `\n`) ready to write to the socket.

use super::PRESET_CLEAR;

/// Format a preset command.
///
/// Values are absolute target angles and are sent with two decimals:
/// `PRESET:x:{x},y:{y},z:{z}\n`
pub fn format_preset_command(x: f64, y: f64, z: f64) -> String {
    format!("PRESET:x:{:.2},y:{:.2},z:{:.2}\n", x, y, z)
}

/// Format the preset clear command: `PRESET:CLEAR\n`
pub fn format_clear_command() -> String {
    format!("{}\n", PRESET_CLEAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{parse_line, SensorEvent};
    use crate::state::Orientation;

    #[test]
    fn test_format_preset() {
        assert_eq!(
            format_preset_command(17.2, 1.7, -75.0),
            "PRESET:x:17.20,y:1.70,z:-75.00\n"
        );
        assert_eq!(
            format_preset_command(-22.5, -2.9, -170.0),
            "PRESET:x:-22.50,y:-2.90,z:-170.00\n"
        );
    }

    #[test]
    fn test_format_preset_rounds_to_two_decimals() {
        assert_eq!(
            format_preset_command(1.005, 2.0 / 3.0, 100.0),
            "PRESET:x:1.00,y:0.67,z:100.00\n"
        );
    }

    #[test]
    fn test_format_clear() {
        assert_eq!(format_clear_command(), "PRESET:CLEAR\n");
    }

    #[test]
    fn test_sensor_echo_of_our_preset_parses() {
        // The sensor echoes our own command back; make sure we understand it
        let cmd = format_preset_command(2.6, 12.2, -110.0);
        let event = parse_line(cmd.trim_end_matches('\n')).unwrap();
        assert_eq!(
            event,
            Some(SensorEvent::PresetUpdate(Orientation::new(2.6, 12.2, -110.0)))
        );
    }
}
