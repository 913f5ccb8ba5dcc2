//! Plain-text rendering of evaluation results.

use std::fmt::{self, Write as _};

use crate::evaluation::domain::{ClassificationReport, EvalResult};

const HEADERS: [&str; 4] = ["precision", "recall", "f1-score", "support"];
const MIN_WIDTH: usize = "weighted avg".len();

/// `"<Name> Accuracy: 87.50%"`.
pub fn format_accuracy(name: &str, accuracy: f64) -> String {
    format!("{name} Accuracy: {:.2}%", accuracy * 100.0)
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.to_string().len())
            .max()
            .unwrap_or(0)
            .max(MIN_WIDTH);

        write!(f, "{:>width$} ", "")?;
        for h in HEADERS {
            write!(f, " {h:>9}")?;
        }
        writeln!(f)?;
        writeln!(f)?;

        for c in &self.classes {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, avg) in [
            ("macro avg", &self.macro_avg),
            ("weighted avg", &self.weighted_avg),
        ] {
            writeln!(
                f,
                "{name:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                avg.precision, avg.recall, avg.f1, avg.support
            )?;
        }
        Ok(())
    }
}

/// Accuracy lines for every model, then each model's classification report.
pub fn render(results: &[EvalResult]) -> String {
    let mut out = String::new();
    for r in results {
        let line = format_accuracy(r.model.display_name(), r.accuracy);
        let _ = writeln!(out, "{line}");
    }
    for r in results {
        let _ = write!(
            out,
            "\n{} Classification Report:\n{}",
            r.model.display_name(),
            r.report
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::domain::ConfusionMatrix;
    use crate::training::domain::ModelKind;

    #[test]
    fn accuracy_has_two_decimals() {
        assert_eq!(
            format_accuracy("Decision Tree", 0.875),
            "Decision Tree Accuracy: 87.50%"
        );
        assert_eq!(
            format_accuracy("Logistic Regression", 2.0 / 3.0),
            "Logistic Regression Accuracy: 66.67%"
        );
    }

    #[test]
    fn report_table_layout() {
        let m = ConfusionMatrix::from_labels(&[0, 0, 1, 1], &[0, 0, 1, 0]);
        let text = ClassificationReport::from_matrix(&m).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "              precision    recall  f1-score   support"
        );
        assert_eq!(lines[1], "");
        assert_eq!(
            lines[2],
            "           0       0.67      1.00      0.80         2"
        );
        assert_eq!(
            lines[3],
            "           1       1.00      0.50      0.67         2"
        );
        assert_eq!(
            lines[5],
            "    accuracy                           0.75         4"
        );
        assert!(lines[6].starts_with("   macro avg"));
        assert!(lines[7].starts_with("weighted avg"));
    }

    #[test]
    fn render_lists_accuracies_first() {
        let m = ConfusionMatrix::from_labels(&[0, 1], &[0, 1]);
        let result = EvalResult {
            model: ModelKind::DecisionTree,
            accuracy: 1.0,
            report: ClassificationReport::from_matrix(&m),
            confusion: m,
        };
        let text = render(&[result]);
        assert!(text.starts_with("Decision Tree Accuracy: 100.00%\n"));
        assert!(text.contains("Decision Tree Classification Report:"));
    }
}
