//! Sliding moving-average window

use std::collections::VecDeque;

pub const WINDOW_SIZE: usize = 5;

/// Bounded FIFO of the most recent mono samples
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<i32>,
    capacity: usize,
    sum: i64,
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(WINDOW_SIZE)
    }
}

impl SampleWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0,
        }
    }

    /// Push a sample, evicting the oldest one once the window is full
    pub fn push(&mut self, sample: i32) {
        if self.samples.len() == self.capacity {
            if let Some(oldest) = self.samples.pop_front() {
                self.sum -= oldest as i64;
            }
        }
        self.samples.push_back(sample);
        self.sum += sample as i64;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean of the current contents, 0 when empty
    pub fn mean(&self) -> i32 {
        rounded_mean(self.sum, self.samples.len())
    }
}

/// `sum / count` rounded to nearest, ties away from zero
pub fn rounded_mean(sum: i64, count: usize) -> i32 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as i32
}
