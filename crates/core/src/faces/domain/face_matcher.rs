use crate::faces::domain::face_record::FaceRecord;

/// Result of comparing a candidate face against one or more embeddings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMatch {
    pub is_match: bool,
    /// Smallest distance found, or `-1.0` when nothing was comparable.
    pub distance: f64,
}

impl FaceMatch {
    pub fn no_match(distance: f64) -> Self {
        Self {
            is_match: false,
            distance,
        }
    }
}

/// Domain interface for deciding whether embeddings belong to the same face.
///
/// Implementations must be pure: the same inputs and configuration always
/// give the same answer.
pub trait FaceMatcher: Send {
    fn match_embeddings(&self, candidate: &FaceRecord, others: &[&[f64]]) -> FaceMatch;
}
