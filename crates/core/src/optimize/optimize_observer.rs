use crate::optimize::pair_outcome::{OptimizationResult, PairOutcome};

/// Event sink for optimization runs.
///
/// Injected into the optimizer so callers decide where diagnostics go
/// (log facade, tests, nothing) without touching the pairing code.
pub trait OptimizeObserver: Send {
    /// Number of eligible faces returned by the store.
    fn faces_fetched(&mut self, count: usize);

    /// A matched pair went to the store and was merged or rejected.
    /// A rejected merge does not stop the run.
    fn pair_resolved(&mut self, subject_id: &str, outcome: &PairOutcome);

    /// Totals for a single subject group.
    fn group_finished(&mut self, subject_id: &str, group: &OptimizationResult);

    /// End-of-run report. Default: no-op.
    fn summary(&self, _result: &OptimizationResult) {}
}

/// Observer that discards all events.
pub struct NullOptimizeObserver;

impl OptimizeObserver for NullOptimizeObserver {
    fn faces_fetched(&mut self, _count: usize) {}
    fn pair_resolved(&mut self, _subject_id: &str, _outcome: &PairOutcome) {}
    fn group_finished(&mut self, _subject_id: &str, _group: &OptimizationResult) {}
}

/// Forwards events to the `log` facade and keeps counters for the summary.
#[derive(Default)]
pub struct LogOptimizeObserver {
    fetched: usize,
    matched: usize,
    failures: Vec<String>,
}

impl LogOptimizeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary_string(&self, result: &OptimizationResult) -> String {
        let mut lines = vec![format!(
            "Optimization summary ({} eligible faces, {} subjects):",
            self.fetched, result.groups
        )];
        lines.push(format!("  matched pairs: {}", self.matched));
        lines.push(format!("  merged faces:  {}", result.merged));
        if !self.failures.is_empty() {
            lines.push(format!("  failed merges: {}", self.failures.len()));
            for failure in &self.failures {
                lines.push(format!("    {failure}"));
            }
        }
        if result.cancelled {
            lines.push("  run cancelled before all subjects were processed".to_string());
        }
        lines.join("\n")
    }
}

impl OptimizeObserver for LogOptimizeObserver {
    fn faces_fetched(&mut self, count: usize) {
        self.fetched = count;
        log::debug!("faces: found {count} manually added faces");
    }

    fn pair_resolved(&mut self, subject_id: &str, outcome: &PairOutcome) {
        match outcome {
            PairOutcome::Merged {
                a,
                b,
                distance,
                merged_id,
            } => {
                self.matched += 1;
                log::debug!(
                    "faces: merged {a} with {b} into {merged_id}, subject {subject_id}, dist {distance:.6}"
                );
            }
            PairOutcome::Failed { a, b, error } => {
                self.matched += 1;
                self.failures.push(format!("{a} + {b} ({subject_id}): {error}"));
                log::error!("faces: {error} (merge {a} with {b})");
            }
            PairOutcome::Skipped(reason) => {
                log::trace!("faces: skipped pair in subject {subject_id} ({reason:?})");
            }
        }
    }

    fn group_finished(&mut self, subject_id: &str, group: &OptimizationResult) {
        if group.merged > 0 || group.failed > 0 {
            log::debug!(
                "faces: subject {subject_id} merged {}, failed {}",
                group.merged,
                group.failed
            );
        }
    }

    fn summary(&self, result: &OptimizationResult) {
        log::info!("{}", self.summary_string(result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faces::domain::face_store::StoreError;
    use crate::optimize::pair_outcome::SkipReason;

    fn merged(a: &str, b: &str) -> PairOutcome {
        PairOutcome::Merged {
            a: a.into(),
            b: b.into(),
            distance: 0.1,
            merged_id: format!("{a}{b}"),
        }
    }

    fn failed(a: &str, b: &str, error: StoreError) -> PairOutcome {
        PairOutcome::Failed {
            a: a.into(),
            b: b.into(),
            error,
        }
    }

    #[test]
    fn test_null_observer_all_methods_are_noop() {
        let mut observer = NullOptimizeObserver;
        observer.faces_fetched(3);
        observer.pair_resolved("s1", &merged("a", "b"));
        observer.pair_resolved("s1", &PairOutcome::Skipped(SkipReason::NoMatch));
        observer.group_finished("s1", &OptimizationResult::default());
        observer.summary(&OptimizationResult::default());
    }

    #[test]
    fn test_log_observer_counts_events() {
        let mut observer = LogOptimizeObserver::new();
        observer.faces_fetched(4);
        observer.pair_resolved("s1", &merged("a", "b"));
        observer.pair_resolved("s1", &PairOutcome::Skipped(SkipReason::AlreadyPaired));
        observer.pair_resolved("s2", &failed("c", "d", StoreError::UnknownFace("c".into())));

        assert_eq!(observer.fetched, 4);
        assert_eq!(observer.matched, 2);
        assert_eq!(observer.failures.len(), 1);
        assert!(observer.failures[0].contains("face c not found"));
    }

    #[test]
    fn test_summary_lists_failures() {
        let mut observer = LogOptimizeObserver::new();
        observer.faces_fetched(4);
        observer.pair_resolved("s1", &failed("a", "b", StoreError::SameFace("a".into())));
        let result = OptimizationResult {
            merged: 0,
            failed: 1,
            groups: 1,
            cancelled: false,
        };

        let summary = observer.summary_string(&result);

        assert!(summary.contains("4 eligible faces, 1 subjects"));
        assert!(summary.contains("failed merges: 1"));
        assert!(summary.contains("a + b (s1)"));
        assert!(!summary.contains("cancelled"));
    }

    #[test]
    fn test_summary_mentions_cancellation() {
        let observer = LogOptimizeObserver::new();
        let result = OptimizationResult {
            cancelled: true,
            ..Default::default()
        };
        assert!(observer.summary_string(&result).contains("cancelled"));
    }
}
