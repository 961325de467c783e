//! Embedding math shared by the matcher and the face store.

use ndarray::{Array1, ArrayView1, Zip};

/// Euclidean distance between two embeddings, or `None` if their
/// dimensions differ or either is empty.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }
    let sum_sq = Zip::from(ArrayView1::from(a))
        .and(ArrayView1::from(b))
        .fold(0.0, |acc, &x, &y| acc + (x - y) * (x - y));
    Some(sum_sq.sqrt())
}

/// Weighted mean of `(embedding, weight)` pairs.
///
/// Returns `None` for empty input, mismatched dimensions, or a non-positive
/// total weight.
pub fn weighted_midpoint(entries: &[(&[f64], f64)]) -> Option<Vec<f64>> {
    let (first, _) = entries.first()?;
    let dim = first.len();
    if dim == 0 || entries.iter().any(|(e, _)| e.len() != dim) {
        return None;
    }

    let total: f64 = entries.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }

    let mut acc = Array1::<f64>::zeros(dim);
    for (embedding, weight) in entries {
        acc.scaled_add(*weight, &ArrayView1::from(*embedding));
    }
    acc /= total;
    Some(acc.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_identical_is_zero() {
        let a = [0.3, 0.4, 0.5];
        assert_relative_eq!(euclidean_distance(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_pythagorean() {
        assert_relative_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_distance_dimension_mismatch() {
        assert!(euclidean_distance(&[1.0, 2.0], &[1.0]).is_none());
    }

    #[test]
    fn test_distance_empty() {
        assert!(euclidean_distance(&[], &[]).is_none());
    }

    #[test]
    fn test_midpoint_equal_weights() {
        let a = [0.0, 2.0];
        let b = [2.0, 0.0];
        let mid = weighted_midpoint(&[(&a[..], 1.0), (&b[..], 1.0)]).unwrap();
        assert_relative_eq!(mid[0], 1.0);
        assert_relative_eq!(mid[1], 1.0);
    }

    #[test]
    fn test_midpoint_weighted_toward_heavier() {
        let a = [0.0];
        let b = [4.0];
        let mid = weighted_midpoint(&[(&a[..], 3.0), (&b[..], 1.0)]).unwrap();
        assert_relative_eq!(mid[0], 1.0);
    }

    #[test]
    fn test_midpoint_rejects_mismatch_and_empty() {
        let two = [0.0, 1.0];
        let one = [1.0];
        assert!(weighted_midpoint(&[]).is_none());
        assert!(weighted_midpoint(&[(&two[..], 1.0), (&one[..], 1.0)]).is_none());
        assert!(weighted_midpoint(&[(&one[..], 0.0)]).is_none());
    }
}
