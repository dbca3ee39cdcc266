//! Binary classification metrics: confusion matrix, text report, ROC and
//! precision-recall curves.

use std::fmt;

/// Counts for a binary problem, `true` being the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tp: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(actual: &[bool], predicted: &[bool]) -> Self {
        let mut cm = ConfusionMatrix::default();
        for (&truth, &guess) in actual.iter().zip(predicted) {
            match (truth, guess) {
                (false, false) => cm.tn += 1,
                (false, true) => cm.fp += 1,
                (true, false) => cm.fn_ += 1,
                (true, true) => cm.tp += 1,
            }
        }
        cm
    }

    /// Row-major `[actual][predicted]`, negative class first.
    pub fn as_grid(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }

    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tn + self.tp, self.total())
    }

    /// Statistics for one class; `positive = false` scores the negative class.
    pub fn class_stats(&self, positive: bool) -> ClassStats {
        let (tp, fp, fn_) = if positive {
            (self.tp, self.fp, self.fn_)
        } else {
            (self.tn, self.fn_, self.fp)
        };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        ClassStats {
            precision,
            recall,
            f1,
            support: tp + fn_,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassStats {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class precision/recall/F1 plus accuracy and averages.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub negative: ClassStats,
    pub positive: ClassStats,
    pub accuracy: f64,
    pub macro_avg: ClassStats,
    pub weighted_avg: ClassStats,
}

impl ClassificationReport {
    pub fn new(actual: &[bool], predicted: &[bool]) -> Self {
        let cm = ConfusionMatrix::from_predictions(actual, predicted);
        let negative = cm.class_stats(false);
        let positive = cm.class_stats(true);
        let total = cm.total();

        let macro_avg = ClassStats {
            precision: (negative.precision + positive.precision) / 2.0,
            recall: (negative.recall + positive.recall) / 2.0,
            f1: (negative.f1 + positive.f1) / 2.0,
            support: total,
        };
        let weight = |f: fn(&ClassStats) -> f64| {
            if total == 0 {
                0.0
            } else {
                (f(&negative) * negative.support as f64 + f(&positive) * positive.support as f64)
                    / total as f64
            }
        };
        let weighted_avg = ClassStats {
            precision: weight(|s| s.precision),
            recall: weight(|s| s.recall),
            f1: weight(|s| s.f1),
            support: total,
        };

        ClassificationReport {
            negative,
            positive,
            accuracy: cm.accuracy(),
            macro_avg,
            weighted_avg,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>W$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        write_row(f, "0", &self.negative)?;
        write_row(f, "1", &self.positive)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>W$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)
    }
}

/// Width of the row-name column, sized for "weighted avg".
const W: usize = 12;

fn write_row(f: &mut fmt::Formatter<'_>, name: &str, s: &ClassStats) -> fmt::Result {
    writeln!(
        f,
        "{name:>W$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
        s.precision, s.recall, s.f1, s.support
    )
}

/// A curve as parallel `x`/`y` coordinate lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Curve {
    pub fn auc(&self) -> f64 {
        auc(&self.x, &self.y)
    }
}

/// Cumulative `(false positives, true positives)` at each distinct score,
/// walking thresholds from high to low.
fn threshold_counts(actual: &[bool], scores: &[f64]) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut counts = Vec::new();
    let (mut fps, mut tps) = (0, 0);
    for (rank, &i) in order.iter().enumerate() {
        if actual[i] {
            tps += 1;
        } else {
            fps += 1;
        }
        let last_of_score = order
            .get(rank + 1)
            .is_none_or(|&next| scores[next] != scores[i]);
        if last_of_score {
            counts.push((fps, tps));
        }
    }
    counts
}

/// False-positive rate (`x`) against true-positive rate (`y`), from `(0, 0)`.
pub fn roc_curve(actual: &[bool], scores: &[f64]) -> Curve {
    let positives = actual.iter().filter(|&&a| a).count();
    let negatives = actual.len() - positives;

    let mut curve = Curve {
        x: vec![0.0],
        y: vec![0.0],
    };
    for (fps, tps) in threshold_counts(actual, scores) {
        curve.x.push(ratio(fps, negatives));
        curve.y.push(ratio(tps, positives));
    }
    curve
}

/// Recall (`x`) against precision (`y`), starting at recall 0 / precision 1.
pub fn precision_recall_curve(actual: &[bool], scores: &[f64]) -> Curve {
    let positives = actual.iter().filter(|&&a| a).count();

    let mut curve = Curve {
        x: vec![0.0],
        y: vec![1.0],
    };
    for (fps, tps) in threshold_counts(actual, scores) {
        curve.x.push(if positives == 0 {
            1.0
        } else {
            ratio(tps, positives)
        });
        curve.y.push(ratio(tps, tps + fps));
    }
    curve
}

/// Trapezoidal area under a curve whose `x` is monotonic in either direction.
pub fn auc(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum::<f64>()
        .abs()
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn confusion_counts() {
        let actual = [true, true, false, false, false];
        let predicted = [true, false, true, false, false];
        let cm = ConfusionMatrix::from_predictions(&actual, &predicted);
        assert_eq!(cm.as_grid(), [[2, 1], [1, 1]]);
        assert!(close(cm.accuracy(), 0.6));
    }

    #[test]
    fn report_numbers_and_layout() {
        let actual = [true, true, false, false, false, false];
        let predicted = [true, false, false, false, false, true];
        let report = ClassificationReport::new(&actual, &predicted);
        assert!(close(report.positive.precision, 0.5));
        assert!(close(report.positive.recall, 0.5));
        assert!(close(report.negative.recall, 0.75));
        assert_eq!(report.weighted_avg.support, 6);

        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].trim_start(), "precision    recall  f1-score   support");
        assert_eq!(lines[2], "           0       0.75      0.75      0.75         4");
        assert_eq!(lines[3], "           1       0.50      0.50      0.50         2");
        assert!(lines[5].starts_with("    accuracy"));
        assert!(lines[7].starts_with("weighted avg"));
    }

    #[test]
    fn zero_division_reports_zero() {
        let report = ClassificationReport::new(&[true, false], &[false, false]);
        assert_eq!(report.positive.precision, 0.0);
        assert_eq!(report.positive.f1, 0.0);
    }

    #[test]
    fn perfect_ranking_has_unit_auc() {
        let actual = [false, false, true, true];
        let scores = [0.1, 0.2, 0.8, 0.9];
        assert!(close(roc_curve(&actual, &scores).auc(), 1.0));
        assert!(close(precision_recall_curve(&actual, &scores).auc(), 1.0));
    }

    #[test]
    fn roc_groups_tied_scores() {
        let actual = [true, false, true, false];
        let scores = [0.5, 0.5, 0.9, 0.1];
        let roc = roc_curve(&actual, &scores);
        assert_eq!(roc.x, vec![0.0, 0.0, 0.5, 1.0]);
        assert_eq!(roc.y, vec![0.0, 0.5, 1.0, 1.0]);
        assert!(close(roc.auc(), 0.875));
    }

    #[test]
    fn pr_curve_ends_at_full_recall() {
        let actual = [true, false, true, false];
        let scores = [0.5, 0.5, 0.9, 0.1];
        let pr = precision_recall_curve(&actual, &scores);
        assert_eq!(pr.x.first(), Some(&0.0));
        assert_eq!(pr.y.first(), Some(&1.0));
        assert_eq!(pr.x.last(), Some(&1.0));
        assert!(close(*pr.y.last().unwrap(), 0.5));
    }

    #[test]
    fn auc_is_direction_agnostic() {
        assert!(close(auc(&[0.0, 1.0], &[1.0, 1.0]), 1.0));
        assert!(close(auc(&[1.0, 0.0], &[1.0, 1.0]), 1.0));
    }
}
