//! Per-run broadcast counters and the summary built from them.

use super::DeliveryOutcome;
use crate::i18n::get_text_with;

/// Counters for one broadcast run.
///
/// `total` grows with every recorded outcome, so
/// `total == delivered + blocked + failed` holds at any point of the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastTally {
    pub total: usize,
    pub delivered: usize,
    pub blocked: usize,
    pub failed: usize,
}

impl BroadcastTally {
    /// Count one delivery attempt.
    pub fn record(&mut self, outcome: DeliveryOutcome) {
        self.total += 1;
        match outcome {
            DeliveryOutcome::Delivered => self.delivered += 1,
            DeliveryOutcome::Blocked => self.blocked += 1,
            DeliveryOutcome::Failed => self.failed += 1,
        }
    }

    /// Render the final HTML summary in the operator's language.
    ///
    /// `audience` selects the catalog section (`users` or `groups`).
    pub fn summary(&self, lang: &str, audience: &str) -> String {
        let total = self.total.to_string();
        let delivered = self.delivered.to_string();
        let blocked = self.blocked.to_string();
        let failed = self.failed.to_string();

        get_text_with(
            lang,
            &format!("broadcast.{audience}.summary"),
            &[
                ("total", &total),
                ("delivered", &delivered),
                ("blocked", &blocked),
                ("failed", &failed),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_sum() {
        let mut tally = BroadcastTally::default();
        let outcomes = [
            DeliveryOutcome::Delivered,
            DeliveryOutcome::Blocked,
            DeliveryOutcome::Failed,
            DeliveryOutcome::Delivered,
        ];
        for outcome in outcomes {
            tally.record(outcome);
            assert_eq!(tally.total, tally.delivered + tally.blocked + tally.failed);
        }
        assert_eq!(
            tally,
            BroadcastTally { total: 4, delivered: 2, blocked: 1, failed: 1 }
        );
    }

    #[test]
    fn test_summary_contains_counts() {
        let tally = BroadcastTally { total: 10, delivered: 7, blocked: 2, failed: 1 };
        let text = tally.summary("en", "users");
        assert!(text.contains("<b>Total users:</b> 10"));
        assert!(text.contains("7"));
        assert!(text.contains("2"));
        assert!(!text.contains("{failed}"));

        let text = tally.summary("pt", "groups");
        assert!(text.contains("10"));
        assert!(!text.contains("{total}"));
    }
}
