//! Orientation History Storage
//!
//! Fixed-size FIFO of orientation samples for the scrolling plot.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::state::Orientation;

/// Number of samples kept for plotting
pub const HISTORY_CAPACITY: usize = 200;

/// A single point on the plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since the client started
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Sample {
    pub fn new(time: f64, orientation: Orientation) -> Self {
        Sample {
            time,
            x: orientation.x,
            y: orientation.y,
            z: orientation.z,
        }
    }
}

/// Per-axis series, in the shape a plotting widget wants
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub time: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

/// Bounded history, oldest sample first
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        History::new(HISTORY_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        History {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one once full
    pub fn push(&mut self, sample: Sample) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Copy out the samples in chronological order
    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    /// Split into per-axis vectors for plotting
    pub fn series(&self) -> Series {
        let n = self.samples.len();
        let mut series = Series {
            time: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
        };
        for s in &self.samples {
            series.time.push(s.time);
            series.x.push(s.x);
            series.y.push(s.y);
            series.z.push(s.z);
        }
        series
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sample(i: usize) -> Sample {
        Sample::new(i as f64 * 0.05, Orientation::new(i as f64, 0.0, -(i as f64)))
    }

    #[test]
    fn test_push_and_latest() {
        let mut history = History::default();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), HISTORY_CAPACITY);

        history.push(make_sample(1));
        history.push(make_sample(2));
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().x, 2.0);
    }

    #[test]
    fn test_bounded_to_most_recent() {
        let mut history = History::default();
        for i in 0..250 {
            history.push(make_sample(i));
        }

        assert_eq!(history.len(), 200);
        let samples = history.to_vec();
        // Oldest 50 evicted, remainder still in order
        for (offset, sample) in samples.iter().enumerate() {
            assert_eq!(sample.x, (50 + offset) as f64);
        }
        assert!(samples.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn test_series() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.push(make_sample(i));
        }
        let series = history.series();
        assert_eq!(series.x, vec![2.0, 3.0, 4.0]);
        assert_eq!(series.z, vec![-2.0, -3.0, -4.0]);
        assert_eq!(series.time.len(), 3);
    }

    #[test]
    fn test_zero_capacity() {
        let mut history = History::new(0);
        history.push(make_sample(1));
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut history = History::default();
        history.push(make_sample(1));
        history.clear();
        assert!(history.latest().is_none());
    }
}
