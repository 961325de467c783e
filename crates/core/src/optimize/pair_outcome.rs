use crate::faces::domain::face_store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// One of the faces was already consumed by a merge decision this run.
    AlreadyPaired,
    NoMatch,
}

/// What happened to one candidate pair.
#[derive(Debug)]
pub enum PairOutcome {
    Merged {
        a: String,
        b: String,
        distance: f64,
        merged_id: String,
    },
    Skipped(SkipReason),
    Failed {
        a: String,
        b: String,
        error: StoreError,
    },
}

/// Totals of an optimization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizationResult {
    /// Faces consumed by successful merges; two per merge.
    pub merged: usize,
    /// Matched pairs whose merge was rejected by the store.
    pub failed: usize,
    /// Subject groups that were processed.
    pub groups: usize,
    /// The run stopped early between groups.
    pub cancelled: bool,
}

impl OptimizationResult {
    pub fn record(&mut self, outcome: &PairOutcome) {
        match outcome {
            PairOutcome::Merged { .. } => self.merged += 2,
            PairOutcome::Failed { .. } => self.failed += 1,
            PairOutcome::Skipped(_) => {}
        }
    }
}
