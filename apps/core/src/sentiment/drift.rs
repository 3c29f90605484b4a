//! Accuracy-drift detection over the bounded performance history.
//!
//! The most recent slice of the history is compared with everything before it.
//! A drop of the recent mean below the historical mean by more than the
//! retraining threshold is reported as drift.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Push `value` and evict from the front until `len <= capacity`.
pub fn push_bounded(history: &mut VecDeque<f64>, value: f64, capacity: usize) {
    history.push_back(value);
    while history.len() > capacity {
        history.pop_front();
    }
}

/// Comparison of the two windows of a full history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub historical_mean: f64,
    pub recent_mean: f64,
    /// `historical_mean - recent_mean`, positive when accuracy fell
    pub drop: f64,
    pub recent_window: usize,
    pub drift_detected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriftDetector {
    window_size: usize,
    threshold: f64,
    recent_ratio: f64,
}

impl DriftDetector {
    pub fn new(window_size: usize, threshold: f64, recent_ratio: f64) -> Self {
        Self {
            window_size,
            threshold,
            recent_ratio,
        }
    }

    /// Size of the recent window for a history of `len` entries
    fn recent_len(&self, len: usize) -> usize {
        let raw = (len as f64 * self.recent_ratio).ceil() as usize;
        raw.clamp(1, len.saturating_sub(1).max(1))
    }

    /// `None` until the history holds a full window
    pub fn report(&self, history: &VecDeque<f64>) -> Option<DriftReport> {
        let len = history.len();
        if len < self.window_size || len < 2 {
            return None;
        }

        let recent_window = self.recent_len(len);
        let split = len - recent_window;

        let historical_mean = history.iter().take(split).sum::<f64>() / split as f64;
        let recent_mean = history.iter().skip(split).sum::<f64>() / recent_window as f64;
        let drop = historical_mean - recent_mean;

        Some(DriftReport {
            historical_mean,
            recent_mean,
            drop,
            recent_window,
            drift_detected: drop > self.threshold,
        })
    }

    pub fn detect(&self, history: &VecDeque<f64>) -> bool {
        self.report(history).is_some_and(|r| r.drift_detected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(values: &[f64]) -> VecDeque<f64> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_short_history_never_drifts() {
        let detector = DriftDetector::new(5, 0.05, 0.2);
        let h = history(&[0.9, 0.9, 0.1, 0.1]);
        assert!(detector.report(&h).is_none());
        assert!(!detector.detect(&h));
    }

    #[test]
    fn test_degrading_history_drifts() {
        let detector = DriftDetector::new(5, 0.05, 0.2);
        let h = history(&[0.9, 0.9, 0.9, 0.9, 0.5]);
        let report = detector.report(&h).unwrap();
        assert_eq!(report.recent_window, 1);
        assert!((report.drop - 0.4).abs() < 1e-12);
        assert!(report.drift_detected);
    }

    #[test]
    fn test_stable_history_does_not_drift() {
        let detector = DriftDetector::new(5, 0.05, 0.2);
        assert!(!detector.detect(&history(&[0.8, 0.82, 0.79, 0.81, 0.8])));
    }

    #[test]
    fn test_improvement_is_not_drift() {
        let detector = DriftDetector::new(4, 0.05, 0.2);
        assert!(!detector.detect(&history(&[0.2, 0.3, 0.4, 0.9])));
    }

    #[test]
    fn test_recent_window_rounds_up() {
        let detector = DriftDetector::new(2, 0.05, 0.2);
        // ceil(6 * 0.2) = 2
        let report = detector.report(&history(&[1.0; 6])).unwrap();
        assert_eq!(report.recent_window, 2);
    }

    #[test]
    fn test_push_bounded_evicts_oldest() {
        let mut h = VecDeque::new();
        for v in [0.1, 0.2, 0.3, 0.4] {
            push_bounded(&mut h, v, 3);
        }
        assert_eq!(h, history(&[0.2, 0.3, 0.4]));
    }
}
