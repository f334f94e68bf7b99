use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub const TIMING_WINDOW_LEN: usize = 120;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingSnapshot {
    pub last_ms: f32,
    pub avg_ms: f32,
    pub max_ms: f32,
    pub samples: usize,
}

/// Last [`TIMING_WINDOW_LEN`] samples of one timed scope.
#[derive(Debug, Clone)]
pub struct RollingWindowMs {
    samples_ms: [f32; TIMING_WINDOW_LEN],
    head: usize,
    count: usize,
    sum_ms: f32,
    last_ms: f32,
}

impl Default for RollingWindowMs {
    fn default() -> Self {
        Self {
            samples_ms: [0.0; TIMING_WINDOW_LEN],
            head: 0,
            count: 0,
            sum_ms: 0.0,
            last_ms: 0.0,
        }
    }
}

impl RollingWindowMs {
    pub fn push(&mut self, duration: Duration) {
        self.push_ms(duration_to_ms(duration));
    }

    pub fn push_ms(&mut self, value_ms: f32) {
        self.last_ms = value_ms;
        let evicted = if self.count < TIMING_WINDOW_LEN {
            self.count += 1;
            0.0
        } else {
            self.samples_ms[self.head]
        };
        self.samples_ms[self.head] = value_ms;
        self.head = (self.head + 1) % TIMING_WINDOW_LEN;
        self.sum_ms += value_ms - evicted;
    }

    pub fn snapshot(&self) -> TimingSnapshot {
        if self.count == 0 {
            return TimingSnapshot::default();
        }

        let max_ms = self.samples_ms[..self.count]
            .iter()
            .copied()
            .fold(f32::MIN, f32::max);

        TimingSnapshot {
            last_ms: self.last_ms,
            avg_ms: self.sum_ms / self.count as f32,
            max_ms,
            samples: self.count,
        }
    }
}

/// Rolling timings keyed by scope label, e.g. one per behavior.
#[derive(Debug, Default)]
pub struct ScopeTimings {
    windows: BTreeMap<String, RollingWindowMs>,
}

impl ScopeTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: &str, duration: Duration) {
        match self.windows.get_mut(label) {
            Some(window) => window.push(duration),
            None => {
                let mut window = RollingWindowMs::default();
                window.push(duration);
                self.windows.insert(label.to_string(), window);
            }
        }
    }

    pub fn time<R>(&mut self, label: &str, scope: impl FnOnce() -> R) -> R {
        let started = Instant::now();
        let result = scope();
        self.record(label, started.elapsed());
        result
    }

    pub fn snapshot(&self, label: &str) -> Option<TimingSnapshot> {
        self.windows.get(label).map(RollingWindowMs::snapshot)
    }

    /// Labels in sorted order with their current snapshot.
    pub fn snapshots(&self) -> Vec<(String, TimingSnapshot)> {
        self.windows
            .iter()
            .map(|(label, window)| (label.clone(), window.snapshot()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.windows.clear();
    }
}

fn duration_to_ms(duration: Duration) -> f32 {
    duration.as_secs_f32() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_snapshot_is_zeroed() {
        let window = RollingWindowMs::default();
        assert_eq!(window.snapshot(), TimingSnapshot::default());
    }

    #[test]
    fn partial_window_average_uses_sample_count() {
        let mut window = RollingWindowMs::default();
        window.push_ms(1.0);
        window.push_ms(2.0);
        window.push_ms(3.0);
        let snapshot = window.snapshot();

        assert_eq!(snapshot.last_ms, 3.0);
        assert!((snapshot.avg_ms - 2.0).abs() < 0.0001);
        assert_eq!(snapshot.max_ms, 3.0);
        assert_eq!(snapshot.samples, 3);
    }

    #[test]
    fn evicted_max_is_forgotten() {
        let mut window = RollingWindowMs::default();
        window.push_ms(100.0);
        for _ in 1..TIMING_WINDOW_LEN {
            window.push_ms(10.0);
        }
        window.push_ms(20.0);
        let snapshot = window.snapshot();

        let expected_avg =
            ((TIMING_WINDOW_LEN as f32 - 2.0) * 10.0 + 20.0 + 10.0) / TIMING_WINDOW_LEN as f32;
        assert_eq!(snapshot.max_ms, 20.0);
        assert_eq!(snapshot.samples, TIMING_WINDOW_LEN);
        assert!((snapshot.avg_ms - expected_avg).abs() < 0.001);
    }

    #[test]
    fn scope_timings_track_labels_separately() {
        let mut timings = ScopeTimings::new();
        timings.record("spin", Duration::from_micros(1_500));
        timings.record("spin", Duration::from_micros(500));
        timings.record("fall", Duration::from_millis(4));

        let spin = timings.snapshot("spin").expect("spin");
        assert_eq!(spin.samples, 2);
        assert!((spin.avg_ms - 1.0).abs() < 0.0001);
        assert!((spin.max_ms - 1.5).abs() < 0.0001);

        let labels = timings
            .snapshots()
            .into_iter()
            .map(|(label, _)| label)
            .collect::<Vec<_>>();
        assert_eq!(labels, ["fall", "spin"]);
        assert!(timings.snapshot("missing").is_none());
    }

    #[test]
    fn time_returns_scope_result_and_records_a_sample() {
        let mut timings = ScopeTimings::new();
        let value = timings.time("answer", || 42);
        assert_eq!(value, 42);
        assert_eq!(timings.snapshot("answer").expect("answer").samples, 1);
    }
}
