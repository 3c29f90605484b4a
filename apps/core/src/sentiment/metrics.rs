//! Confusion matrix and the classification metrics derived from it.

use serde::{Deserialize, Serialize};

use super::label::Label;

/// `matrix[actual][predicted]` counts, indexed by [`Label::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfusionMatrix {
    matrix: [[u64; Label::COUNT]; Label::COUNT],
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, actual: Label, predicted: Label) {
        self.matrix[actual.index()][predicted.index()] += 1;
    }

    pub fn get(&self, actual: Label, predicted: Label) -> u64 {
        self.matrix[actual.index()][predicted.index()]
    }

    /// Sum of every cell
    pub fn total(&self) -> u64 {
        self.matrix.iter().flatten().sum()
    }

    /// Sum of the diagonal
    pub fn correct(&self) -> u64 {
        Label::ALL.iter().map(|l| self.get(*l, *l)).sum()
    }

    pub fn rows(&self) -> &[[u64; Label::COUNT]; Label::COUNT] {
        &self.matrix
    }

    pub fn reset(&mut self) {
        self.matrix = [[0; Label::COUNT]; Label::COUNT];
    }

    /// Fraction of recorded outcomes on the diagonal, 0 when empty
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn harmonic_mean(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Precision/recall breakdown for one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub label: Label,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of feedbacks whose actual label is this one
    pub support: u64,
}

/// Macro-averaged metrics over the three labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub confusion_matrix: ConfusionMatrix,
    pub per_label: Vec<LabelMetrics>,
}

impl PerformanceMetrics {
    pub fn from_matrix(matrix: &ConfusionMatrix) -> Self {
        let per_label: Vec<LabelMetrics> = Label::ALL
            .iter()
            .map(|&label| {
                let tp = matrix.get(label, label);
                let (mut fp, mut fn_) = (0, 0);
                for other in Label::ALL.iter().filter(|&&o| o != label) {
                    fp += matrix.get(*other, label);
                    fn_ += matrix.get(label, *other);
                }

                let precision = ratio(tp, tp + fp);
                let recall = ratio(tp, tp + fn_);
                LabelMetrics {
                    label,
                    precision,
                    recall,
                    f1: harmonic_mean(precision, recall),
                    support: tp + fn_,
                }
            })
            .collect();

        let n = per_label.len() as f64;
        let precision = per_label.iter().map(|m| m.precision).sum::<f64>() / n;
        let recall = per_label.iter().map(|m| m.recall).sum::<f64>() / n;

        Self {
            accuracy: matrix.accuracy(),
            precision,
            recall,
            f1_score: harmonic_mean(precision, recall),
            confusion_matrix: *matrix,
            per_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matrix_has_zero_metrics() {
        let metrics = PerformanceMetrics::from_matrix(&ConfusionMatrix::new());
        assert_eq!(metrics.accuracy, 0.0);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1_score, 0.0);
        assert!(metrics.per_label.iter().all(|m| !m.f1.is_nan()));
    }

    #[test]
    fn test_perfect_predictions() {
        let mut matrix = ConfusionMatrix::new();
        for label in Label::ALL {
            matrix.record(label, label);
        }
        let metrics = PerformanceMetrics::from_matrix(&matrix);
        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.precision, 1.0);
        assert_eq!(metrics.recall, 1.0);
        assert_eq!(metrics.f1_score, 1.0);
    }

    #[test]
    fn test_per_label_counts() {
        let mut matrix = ConfusionMatrix::new();
        matrix.record(Label::Positive, Label::Positive);
        matrix.record(Label::Positive, Label::Positive);
        matrix.record(Label::Negative, Label::Positive);
        matrix.record(Label::Positive, Label::Neutral);

        let metrics = PerformanceMetrics::from_matrix(&matrix);
        let positive = &metrics.per_label[Label::Positive.index()];
        assert!((positive.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((positive.recall - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(positive.support, 3);

        // Negative was never predicted correctly: everything is 0, not NaN.
        let negative = &metrics.per_label[Label::Negative.index()];
        assert_eq!(negative.precision, 0.0);
        assert_eq!(negative.recall, 0.0);
        assert_eq!(metrics.accuracy, 0.5);
    }

    #[test]
    fn test_reset_clears_every_cell() {
        let mut matrix = ConfusionMatrix::new();
        matrix.record(Label::Neutral, Label::Negative);
        matrix.reset();
        assert_eq!(matrix.total(), 0);
    }
}
