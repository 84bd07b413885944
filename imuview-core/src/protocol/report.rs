//! Inbound line parsing (pure)
//!
//! `&str` → `Result<Option<SensorEvent>, ParseError>`. `Ok(None)` means the
//! line is not something we understand and is ignored; `Err` means it looked
//! like a known message but could not be parsed.

use super::{SensorEvent, PRESET_CLEAR, PRESET_PREFIX};
use crate::angle::normalize;
use crate::error::ParseError;
use crate::state::Orientation;

/// Classify and parse one line (without its `\n`).
///
/// Lines are matched most specific first: `PRESET:CLEAR`, then `PRESET:`,
/// then the `X:..,Y:..,Z:..` angle report. Anything else is unrecognized.
pub fn parse_line(line: &str) -> Result<Option<SensorEvent>, ParseError> {
    if line.starts_with(PRESET_CLEAR) {
        return Ok(Some(SensorEvent::PresetClear));
    }

    if let Some(rest) = line.strip_prefix(PRESET_PREFIX) {
        let [x, y, z] = parse_triple(rest, ['x', 'y', 'z'])?;
        return Ok(Some(SensorEvent::PresetUpdate(Orientation::new(x, y, z))));
    }

    if is_angle_report(line) {
        let [x, y, z] = parse_triple(line.trim(), ['X', 'Y', 'Z'])?;
        return Ok(Some(SensorEvent::AngleUpdate(Orientation::new(
            normalize(x),
            normalize(y),
            normalize(z),
        ))));
    }

    Ok(None)
}

fn is_angle_report(line: &str) -> bool {
    line.starts_with("X:") && line.contains(",Y:") && line.contains(",Z:")
}

/// Parse `a:<f>,b:<f>,c:<f>` into three numbers, in field order.
///
/// The label in front of each `:` is not checked; the value is the second
/// `:` separated token of each field.
fn parse_triple(body: &str, labels: [char; 3]) -> Result<[f64; 3], ParseError> {
    let fields: Vec<&str> = body.split(',').collect();
    if fields.len() != 3 {
        return Err(ParseError::FieldCount {
            expected: 3,
            actual: fields.len(),
        });
    }

    let mut values = [0.0; 3];
    for ((value, field), label) in values.iter_mut().zip(fields).zip(labels) {
        let token = field
            .split(':')
            .nth(1)
            .ok_or_else(|| ParseError::MissingSeparator(field.to_string()))?;
        *value = token
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber {
                field: label,
                value: token.to_string(),
            })?;
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angles(line: &str) -> Orientation {
        match parse_line(line) {
            Ok(Some(SensorEvent::AngleUpdate(o))) => o,
            other => panic!("Expected AngleUpdate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_angles_normalized() {
        let o = angles("X:10.0,Y:20.0,Z:350.0");
        assert_eq!(o, Orientation::new(10.0, 20.0, -10.0));
    }

    #[test]
    fn test_parse_angles_tolerates_carriage_return() {
        let o = angles("X:190.5,Y:0,Z:179.0\r");
        assert_eq!(o, Orientation::new(-169.5, 0.0, 179.0));
    }

    #[test]
    fn test_parse_angles_bad_number() {
        let err = parse_line("X:abc,Y:2.0,Z:3.0").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                field: 'X',
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_parse_angles_wrong_field_count() {
        let err = parse_line("X:1.0,Y:2.0,Z:3.0,W:4.0").unwrap_err();
        assert_eq!(
            err,
            ParseError::FieldCount {
                expected: 3,
                actual: 4
            }
        );
    }

    #[test]
    fn test_parse_preset_not_normalized() {
        let event = parse_line("PRESET:x:-44.00,y:31.90,z:180.00").unwrap();
        assert_eq!(
            event,
            Some(SensorEvent::PresetUpdate(Orientation::new(-44.0, 31.9, 180.0)))
        );

        let event = parse_line("PRESET:x:270,y:0,z:359.5").unwrap();
        assert_eq!(
            event,
            Some(SensorEvent::PresetUpdate(Orientation::new(270.0, 0.0, 359.5)))
        );
    }

    #[test]
    fn test_parse_preset_missing_separator() {
        let err = parse_line("PRESET:x:1.0,y2.0,z:3.0").unwrap_err();
        assert_eq!(err, ParseError::MissingSeparator("y2.0".to_string()));
    }

    #[test]
    fn test_parse_preset_too_few_fields() {
        assert!(parse_line("PRESET:x:1.0,y:2.0").is_err());
    }

    #[test]
    fn test_parse_preset_clear_wins_over_preset() {
        assert_eq!(parse_line("PRESET:CLEAR"), Ok(Some(SensorEvent::PresetClear)));
        // Prefix match, like the sensor firmware's own check
        assert_eq!(
            parse_line("PRESET:CLEAR trailing"),
            Ok(Some(SensorEvent::PresetClear))
        );
    }

    #[test]
    fn test_unrecognized_lines_ignored() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("hello"), Ok(None));
        assert_eq!(parse_line("X:1.0,Y:2.0"), Ok(None));
        assert_eq!(parse_line("Y:1.0,X:2.0,Z:3.0"), Ok(None));
        assert_eq!(parse_line("preset:x:1,y:2,z:3"), Ok(None));
    }
}
