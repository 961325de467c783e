use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::faces::domain::face_matcher::{FaceMatch, FaceMatcher};
use crate::faces::domain::face_record::FaceRecord;
use crate::faces::domain::face_store::{FaceStore, StoreError};
use crate::faces::domain::feature_gate::FeatureGate;
use crate::optimize::optimize_observer::OptimizeObserver;
use crate::optimize::pair_outcome::{OptimizationResult, PairOutcome, SkipReason};
use crate::optimize::pairing::{maximum_matching, PairingStrategy};
use crate::optimize::subject_groups::{group_by_subject, PairOrder, SubjectGroup};

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("facial recognition is disabled")]
    FeatureDisabled,
    #[error("failed to fetch faces: {0}")]
    Fetch(#[source] StoreError),
}

/// Merges manually confirmed faces of the same subject that match each other.
///
/// Runs as one synchronous pass: fetch eligible faces, group them by
/// subject, then pair and merge inside each group. Every face is consumed
/// by at most one merge decision per run, so faces that still match after a
/// run are picked up by the next one. Callers must not run two optimizers
/// against the same store at once.
pub struct PairMergeOptimizer {
    store: Box<dyn FaceStore>,
    matcher: Box<dyn FaceMatcher>,
    gate: Box<dyn FeatureGate>,
    observer: Box<dyn OptimizeObserver>,
    strategy: PairingStrategy,
    order: PairOrder,
    cancelled: Arc<AtomicBool>,
}

impl PairMergeOptimizer {
    pub fn new(
        store: Box<dyn FaceStore>,
        matcher: Box<dyn FaceMatcher>,
        gate: Box<dyn FeatureGate>,
        observer: Box<dyn OptimizeObserver>,
    ) -> Self {
        Self {
            store,
            matcher,
            gate,
            observer,
            strategy: PairingStrategy::default(),
            order: PairOrder::default(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_strategy(mut self, strategy: PairingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_order(mut self, order: PairOrder) -> Self {
        self.order = order;
        self
    }

    /// Flag checked between subject groups; setting it stops the run early.
    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn optimize(&mut self) -> Result<OptimizationResult, OptimizeError> {
        if self.gate.is_disabled() {
            return Err(OptimizeError::FeatureDisabled);
        }

        let faces = self
            .store
            .fetch_eligible(true)
            .map_err(OptimizeError::Fetch)?;
        self.observer.faces_fetched(faces.len());

        let mut result = OptimizationResult::default();
        if faces.len() < 2 {
            self.observer.summary(&result);
            return Ok(result);
        }

        for group in group_by_subject(faces, self.order) {
            if self.cancelled.load(Ordering::Relaxed) {
                result.cancelled = true;
                break;
            }

            let group_result = match self.strategy {
                PairingStrategy::Greedy => self.pair_greedy(&group),
                PairingStrategy::Maximum => self.pair_maximum(&group),
            };
            self.observer.group_finished(&group.subject_id, &group_result);

            result.merged += group_result.merged;
            result.failed += group_result.failed;
            result.groups += 1;
        }

        self.observer.summary(&result);
        Ok(result)
    }

    /// Walks every ordered pair once; a face pairs with the first match it meets.
    fn pair_greedy(&mut self, group: &SubjectGroup) -> OptimizationResult {
        let faces = &group.faces;
        let mut paired: HashSet<&str> = HashSet::new();
        let mut result = OptimizationResult::default();

        for (i, a) in faces.iter().enumerate() {
            for (j, b) in faces.iter().enumerate() {
                if i == j {
                    continue;
                }

                let outcome = if paired.contains(a.id.as_str()) || paired.contains(b.id.as_str())
                {
                    PairOutcome::Skipped(SkipReason::AlreadyPaired)
                } else {
                    let found = self.compare(a, b);
                    if found.is_match {
                        paired.insert(&a.id);
                        paired.insert(&b.id);
                        self.merge_pair(&group.subject_id, a, b, found.distance)
                    } else {
                        PairOutcome::Skipped(SkipReason::NoMatch)
                    }
                };
                result.record(&outcome);
            }
        }

        result
    }

    /// Merges the largest set of disjoint matching pairs in the group.
    fn pair_maximum(&mut self, group: &SubjectGroup) -> OptimizationResult {
        let faces = &group.faces;
        let mut result = OptimizationResult::default();
        let mut edges = Vec::new();
        let mut distances: HashMap<(usize, usize), f64> = HashMap::new();

        for i in 0..faces.len() {
            for j in (i + 1)..faces.len() {
                let forward = self.compare(&faces[i], &faces[j]);
                let found = if forward.is_match {
                    forward
                } else {
                    self.compare(&faces[j], &faces[i])
                };
                if found.is_match {
                    edges.push((i, j));
                    distances.insert((i, j), found.distance);
                } else {
                    result.record(&PairOutcome::Skipped(SkipReason::NoMatch));
                }
            }
        }

        let mut paired: HashSet<&str> = HashSet::new();
        for (i, j) in maximum_matching(faces.len(), &edges) {
            let (a, b) = (&faces[i], &faces[j]);
            // Stores may hand back the same id twice.
            let outcome = if paired.contains(a.id.as_str()) || paired.contains(b.id.as_str()) {
                PairOutcome::Skipped(SkipReason::AlreadyPaired)
            } else {
                paired.insert(&a.id);
                paired.insert(&b.id);
                let distance = distances.get(&(i, j)).copied().unwrap_or_default();
                self.merge_pair(&group.subject_id, a, b, distance)
            };
            result.record(&outcome);
        }

        result
    }

    fn compare(&self, candidate: &FaceRecord, other: &FaceRecord) -> FaceMatch {
        self.matcher.match_embeddings(candidate, &[other.embedding.as_slice()])
    }

    fn merge_pair(
        &mut self,
        subject_id: &str,
        a: &FaceRecord,
        b: &FaceRecord,
        distance: f64,
    ) -> PairOutcome {
        let outcome = match self.store.merge_faces([a, b]) {
            Ok(merged) => PairOutcome::Merged {
                a: a.id.clone(),
                b: b.id.clone(),
                distance,
                merged_id: merged.id,
            },
            Err(error) => PairOutcome::Failed {
                a: a.id.clone(),
                b: b.id.clone(),
                error,
            },
        };
        self.observer.pair_resolved(subject_id, &outcome);
        outcome
    }
}
