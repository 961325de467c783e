//! Euclidean face matcher that widens its threshold by the candidate's
//! sample radius.
//!
//! A face cluster built from several detections covers a region of the
//! embedding space rather than a point, so other embeddings match when they
//! fall within `sample_radius + match_dist` of its centre.

use crate::faces::domain::face_matcher::{FaceMatch, FaceMatcher};
use crate::faces::domain::face_record::FaceRecord;
use crate::faces::infrastructure::math;
use crate::shared::constants::DEFAULT_MATCH_DIST;

pub struct RadiusMatcher {
    match_dist: f64,
}

impl RadiusMatcher {
    pub fn new(match_dist: f64) -> Self {
        Self { match_dist }
    }
}

impl Default for RadiusMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_DIST)
    }
}

impl FaceMatcher for RadiusMatcher {
    fn match_embeddings(&self, candidate: &FaceRecord, others: &[&[f64]]) -> FaceMatch {
        let distance = others
            .iter()
            .filter_map(|other| math::euclidean_distance(&candidate.embedding, other))
            .fold(None, |best: Option<f64>, d| Some(best.map_or(d, |b| b.min(d))));

        let Some(distance) = distance else {
            return FaceMatch::no_match(-1.0);
        };

        FaceMatch {
            is_match: distance <= candidate.sample_radius + self.match_dist,
            distance,
        }
    }
}
