//! Streaming line decoder
//!
//! TCP gives us arbitrary chunks: a read may end in the middle of a line, or
//! carry several lines at once. [`LineDecoder`] keeps the unterminated tail
//! between reads and turns every complete line into at most one event.

use super::report::parse_line;
use super::{SensorEvent, MAX_LINE_LENGTH};

/// Reassembles `\n` terminated lines across reads and decodes them.
///
/// Holds no state other than the current partial line and whether it is
/// being skipped. Never blocks and performs no I/O. A partial line longer than
/// [`MAX_LINE_LENGTH`] is discarded together with the rest of that line.
#[derive(Debug, Default, Clone)]
pub struct LineDecoder {
    pending: Vec<u8>,
    /// Skipping input until the next `\n` after an overlong line
    overflow: bool,
}

impl LineDecoder {
    pub fn new() -> Self {
        LineDecoder {
            pending: Vec::new(),
            overflow: false,
        }
    }

    /// Feed one socket read, returning the events of all lines it completed.
    ///
    /// Malformed lines are logged and skipped; they never interrupt the
    /// stream.
    pub fn feed(&mut self, mut data: &[u8]) -> Vec<SensorEvent> {
        if self.overflow {
            match data.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    self.overflow = false;
                    data = &data[pos + 1..];
                }
                None => return Vec::new(),
            }
        }
        self.pending.extend_from_slice(data);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..pos]);

            match parse_line(&line) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {
                    log::trace!("Ignoring line {:?}", line);
                }
                Err(e) => {
                    log::warn!("Discarding malformed line {:?}: {}", line, e);
                }
            }
        }

        if self.pending.len() > MAX_LINE_LENGTH {
            log::warn!(
                "Discarding unterminated line of {} bytes",
                self.pending.len()
            );
            self.pending.clear();
            self.overflow = true;
        }
        events
    }

    /// Number of bytes waiting for a line terminator
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop any partial line, e.g. when a new connection starts
    pub fn reset(&mut self) {
        self.pending.clear();
        self.overflow = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Orientation;

    #[test]
    fn test_single_line() {
        let mut decoder = LineDecoder::new();
        let events = decoder.feed(b"X:10.0,Y:20.0,Z:350.0\n");
        assert_eq!(
            events,
            vec![SensorEvent::AngleUpdate(Orientation::new(10.0, 20.0, -10.0))]
        );
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_line_split_across_reads() {
        let mut decoder = LineDecoder::new();
        assert!(decoder.feed(b"X:1.0,Y:2").is_empty());
        assert_eq!(decoder.pending_len(), 9);

        let events = decoder.feed(b".0,Z:3.0\n");
        assert_eq!(
            events,
            vec![SensorEvent::AngleUpdate(Orientation::new(1.0, 2.0, 3.0))]
        );
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_multiple_lines_in_one_read() {
        let mut decoder = LineDecoder::new();
        let events = decoder.feed(b"PRESET:x:1.00,y:2.00,z:3.00\nX:0,Y:0,Z:0\nPRESET:CLEAR\nX:5");
        assert_eq!(
            events,
            vec![
                SensorEvent::PresetUpdate(Orientation::new(1.0, 2.0, 3.0)),
                SensorEvent::AngleUpdate(Orientation::new(0.0, 0.0, 0.0)),
                SensorEvent::PresetClear,
            ]
        );
        assert_eq!(decoder.pending_len(), 3);
    }

    #[test]
    fn test_malformed_line_discarded() {
        let mut decoder = LineDecoder::new();
        assert!(decoder.feed(b"X:abc,Y:2.0,Z:3.0\n").is_empty());

        // The stream keeps going after a bad line
        let events = decoder.feed(b"garbage\nX:1,Y:2,Z:3\n");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut decoder = LineDecoder::new();
        let mut events = Vec::new();
        for b in b"X:359.0,Y:180.0,Z:90.5\r\n" {
            events.extend(decoder.feed(std::slice::from_ref(b)));
        }
        assert_eq!(
            events,
            vec![SensorEvent::AngleUpdate(Orientation::new(-1.0, -180.0, 90.5))]
        );
    }

    #[test]
    fn test_invalid_utf8_does_not_poison_stream() {
        let mut decoder = LineDecoder::new();
        assert!(decoder.feed(b"\xff\xfe\n").is_empty());
        assert_eq!(decoder.feed(b"PRESET:CLEAR\n"), vec![SensorEvent::PresetClear]);
    }

    #[test]
    fn test_reset_drops_partial_line() {
        let mut decoder = LineDecoder::new();
        decoder.feed(b"X:1.0,Y:2");
        decoder.reset();
        assert!(decoder.feed(b".0,Z:3.0\n").is_empty());
    }

    #[test]
    fn test_overlong_line_dropped() {
        let mut decoder = LineDecoder::new();
        let junk = vec![b'7'; MAX_LINE_LENGTH + 1];
        assert!(decoder.feed(&junk).is_empty());
        assert_eq!(decoder.pending_len(), 0);

        // More of the same line is skipped, including what looks like a report
        assert!(decoder.feed(b"X:1,Y:2,Z:3").is_empty());
        assert_eq!(decoder.pending_len(), 0);

        let events = decoder.feed(b"\nX:4,Y:5,Z:6\n");
        assert_eq!(
            events,
            vec![SensorEvent::AngleUpdate(Orientation::new(4.0, 5.0, 6.0))]
        );
    }

    #[test]
    fn test_partial_line_at_limit_kept() {
        let mut decoder = LineDecoder::new();
        let mut line = b"X:1,Y:2,Z:3".to_vec();
        line.resize(MAX_LINE_LENGTH, b' ');
        assert!(decoder.feed(&line).is_empty());
        assert_eq!(decoder.pending_len(), MAX_LINE_LENGTH);
        assert_eq!(decoder.feed(b"\n").len(), 1);
    }
}
