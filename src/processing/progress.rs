//! Progress reporting
//!
//! A conversion reports a completion percentage after every output sample. Any
//! `FnMut(u8)` closure can act as the sink.

/// Receives completion percentages in `[0, 100]`
pub trait ProgressReporter {
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressReporter for F {
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// Discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _percent: u8) {}
}

/// Logs through `log` each time another `step` percent completes
#[derive(Debug, Clone)]
pub struct LogProgress {
    label: String,
    step: u8,
    next: u8,
}

impl LogProgress {
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self::with_step(label, 10)
    }

    pub fn with_step<S: Into<String>>(label: S, step: u8) -> Self {
        let step = step.clamp(1, 100);
        Self { label: label.into(), step, next: step }
    }
}

impl ProgressReporter for LogProgress {
    fn report(&mut self, percent: u8) {
        if percent >= self.next {
            log::info!("{}: {}%", self.label, percent);
            self.next = percent.saturating_add(self.step);
        }
    }
}

/// `round(100 * done / total)`
pub fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = done.min(total) as u64;
    let total = total as u64;
    ((200 * done + total) / (2 * total)) as u8
}
