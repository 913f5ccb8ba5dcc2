//! Metric structures: confusion matrix, per-class report and the combined
//! evaluation result of one model.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::training::domain::ModelKind;

/// Square count table, rows = actual class, columns = predicted class, both
/// ordered by class label ascending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<usize>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Cross-tabulate aligned label vectors. The class set is the sorted
    /// union of labels seen in either vector.
    ///
    /// # Panics
    ///
    /// Panics when the vectors differ in length; that is a programming error.
    pub fn from_labels(actual: &[usize], predicted: &[usize]) -> Self {
        assert_eq!(
            actual.len(),
            predicted.len(),
            "actual and predicted label vectors must have the same length"
        );
        let labels: Vec<usize> = actual
            .iter()
            .chain(predicted)
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let n = labels.len();
        let mut counts = vec![vec![0usize; n]; n];
        for (a, p) in actual.iter().zip(predicted) {
            // labels is sorted and contains both values
            let row = labels.binary_search(a).unwrap_or_default();
            let col = labels.binary_search(p).unwrap_or_default();
            counts[row][col] += 1;
        }
        Self { labels, counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Correct predictions (diagonal sum).
    pub fn trace(&self) -> usize {
        (0..self.labels.len()).map(|i| self.counts[i][i]).sum()
    }

    /// Actual count per class.
    pub fn row_sums(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    /// Predicted count per class.
    pub fn col_sums(&self) -> Vec<usize> {
        (0..self.labels.len())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    /// Largest single cell, used to scale heatmap colours.
    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.trace(), self.total())
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Precision, recall, F1 and support of one class.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Averaged precision/recall/F1 over all classes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class report plus accuracy, macro and support-weighted averages.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
}

impl ClassificationReport {
    /// Derive the report from a confusion matrix. Zero denominators yield 0.
    pub fn from_matrix(matrix: &ConfusionMatrix) -> Self {
        let actual = matrix.row_sums();
        let predicted = matrix.col_sums();
        let classes: Vec<ClassMetrics> = matrix
            .labels
            .iter()
            .enumerate()
            .map(|(i, &label)| {
                let tp = matrix.counts[i][i];
                let precision = ratio(tp, predicted[i]);
                let recall = ratio(tp, actual[i]);
                ClassMetrics {
                    label,
                    precision,
                    recall,
                    f1: f1(precision, recall),
                    support: actual[i],
                }
            })
            .collect();

        let total = matrix.total();
        let n = classes.len().max(1) as f64;
        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / n,
            support: total,
        };
        let weight = |pick: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                0.0
            } else {
                classes
                    .iter()
                    .map(|c| pick(c) * c.support as f64)
                    .sum::<f64>()
                    / total as f64
            }
        };
        let weighted_avg = AverageMetrics {
            precision: weight(|c| c.precision),
            recall: weight(|c| c.recall),
            f1: weight(|c| c.f1),
            support: total,
        };

        Self {
            accuracy: matrix.accuracy(),
            classes,
            macro_avg,
            weighted_avg,
        }
    }
}

/// Everything computed for one model on the test partition.
#[derive(Clone, Debug, Serialize)]
pub struct EvalResult {
    pub model: ModelKind,
    pub accuracy: f64,
    pub report: ClassificationReport,
    pub confusion: ConfusionMatrix,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sums_match_class_counts() {
        let actual = [0, 0, 1, 1, 1, 0, 1];
        let predicted = [0, 1, 1, 1, 0, 0, 1];
        let m = ConfusionMatrix::from_labels(&actual, &predicted);
        assert_eq!(m.labels, vec![0, 1]);
        assert_eq!(m.counts, vec![vec![2, 1], vec![1, 3]]);
        assert_eq!(m.row_sums(), vec![3, 4]);
        assert_eq!(m.col_sums(), vec![3, 4]);
        assert_eq!(m.total(), 7);
        assert_eq!(m.trace(), 5);
        assert_abs_diff_eq!(m.accuracy() * 7.0, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn labels_are_union_of_both_vectors() {
        let m = ConfusionMatrix::from_labels(&[1, 1], &[0, 1]);
        assert_eq!(m.labels, vec![0, 1]);
        assert_eq!(m.counts, vec![vec![0, 0], vec![1, 1]]);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn length_mismatch_panics() {
        ConfusionMatrix::from_labels(&[0, 1], &[0]);
    }

    #[test]
    fn report_matches_hand_computation() {
        // 3 TP, 1 FP, 2 TN, 1 FN
        let actual = [1, 1, 1, 0, 0, 0, 1];
        let predicted = [1, 1, 1, 1, 0, 0, 0];
        let m = ConfusionMatrix::from_labels(&actual, &predicted);
        let r = ClassificationReport::from_matrix(&m);

        let neg = &r.classes[0];
        assert_eq!(neg.support, 3);
        assert_abs_diff_eq!(neg.precision, 2.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(neg.recall, 2.0 / 3.0, epsilon = 1e-9);

        let pos = &r.classes[1];
        assert_eq!(pos.support, 4);
        assert_abs_diff_eq!(pos.precision, 0.75, epsilon = 1e-9);
        assert_abs_diff_eq!(pos.recall, 0.75, epsilon = 1e-9);
        assert_abs_diff_eq!(pos.f1, 0.75, epsilon = 1e-9);

        assert_abs_diff_eq!(r.accuracy, 5.0 / 7.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            r.macro_avg.precision,
            (2.0 / 3.0 + 0.75) / 2.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            r.weighted_avg.recall,
            (2.0 / 3.0 * 3.0 + 0.75 * 4.0) / 7.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn class_never_predicted_has_zero_precision() {
        let m = ConfusionMatrix::from_labels(&[0, 1, 1], &[0, 0, 0]);
        let r = ClassificationReport::from_matrix(&m);
        assert_eq!(r.classes[1].precision, 0.0);
        assert_eq!(r.classes[1].f1, 0.0);
    }
}
