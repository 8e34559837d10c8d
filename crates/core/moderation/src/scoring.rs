use warden_models::v0::{Evaluation, HistoryRecord};

/// Weights of the priority score components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityWeights {
    pub auto: f64,
    pub confirmed: f64,
    pub reported: f64,
}

impl Default for PriorityWeights {
    fn default() -> PriorityWeights {
        PriorityWeights {
            auto: 1.0,
            confirmed: 0.2,
            reported: 0.1,
        }
    }
}

/// Priority of a freshly handed off case
///
/// `history` must already include the report being handed off.
pub fn priority_score(
    weights: &PriorityWeights,
    evaluation: &Evaluation,
    history: HistoryRecord,
) -> f64 {
    weights.auto * evaluation.auto_score()
        + weights.confirmed * history.times_confirmed as f64
        + weights.reported * history.times_reported as f64
}

#[cfg(test)]
mod tests {
    use warden_models::v0::{Category, Evaluation, HistoryRecord, Severity, SpamSubtype};

    use super::{priority_score, PriorityWeights};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn serious_verdict_with_history() {
        let evaluation =
            Evaluation::violation(Category::Spam, Some(SpamSubtype::Links), Severity::Serious);
        let score = priority_score(
            &PriorityWeights::default(),
            &evaluation,
            HistoryRecord::new(5, 2),
        );

        assert!(close(score, 1.9), "got {score}");
    }

    #[test]
    fn unidentified_first_offence() {
        let score = priority_score(
            &PriorityWeights::default(),
            &Evaluation::Unidentified,
            HistoryRecord::new(1, 0),
        );

        assert!(close(score, 0.1), "got {score}");
    }

    #[test]
    fn minor_counts_half() {
        let evaluation = Evaluation::violation(Category::Harassment, None, Severity::Minor);
        let score = priority_score(
            &PriorityWeights::default(),
            &evaluation,
            HistoryRecord::default(),
        );

        assert!(close(score, 0.5), "got {score}");
    }
}
