use std::fs;
use std::path::{Path, PathBuf};

use crate::faces::domain::face_record::FaceRecord;
use crate::faces::domain::face_store::{FaceStore, StoreError};
use crate::faces::infrastructure::math;
use crate::shared::constants::FACE_ID_LENGTH;

/// Face store holding records in memory, optionally mirrored to a JSON file.
///
/// The file contains a JSON array of face records. Every successful merge
/// rewrites the file before the in-memory state changes, so a failed write
/// leaves both the file and the loaded records untouched.
pub struct JsonFaceStore {
    path: Option<PathBuf>,
    faces: Vec<FaceRecord>,
}

impl JsonFaceStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let json = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let faces: Vec<FaceRecord> = serde_json::from_str(&json)?;
        log::debug!("faces: loaded {} records from {}", faces.len(), path.display());
        Ok(Self {
            path: Some(path.to_path_buf()),
            faces,
        })
    }

    pub fn in_memory(faces: Vec<FaceRecord>) -> Self {
        Self { path: None, faces }
    }

    #[cfg(test)]
    pub(crate) fn faces(&self) -> &[FaceRecord] {
        &self.faces
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.faces
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| StoreError::UnknownFace(id.to_string()))
    }

    fn persist(&self, faces: &[FaceRecord]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(faces)?;
        fs::write(path, json).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })
    }
}

impl FaceStore for JsonFaceStore {
    fn fetch_eligible(&self, manual_only: bool) -> Result<Vec<FaceRecord>, StoreError> {
        Ok(self
            .faces
            .iter()
            .filter(|f| !f.hidden && (!manual_only || f.is_manual()))
            .cloned()
            .collect())
    }

    fn merge_faces(&mut self, faces: [&FaceRecord; 2]) -> Result<FaceRecord, StoreError> {
        let [a, b] = faces;
        if a.id == b.id {
            return Err(StoreError::SameFace(a.id.clone()));
        }

        // Stored state wins over the caller's copies.
        let idx_a = self.position(&a.id)?;
        let idx_b = self.position(&b.id)?;
        let merged = combine(&self.faces[idx_a], &self.faces[idx_b])?;

        let mut next: Vec<FaceRecord> = self
            .faces
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx_a && *i != idx_b)
            .map(|(_, f)| f.clone())
            .collect();

        // Ids stay unique: a record already holding the derived id absorbs
        // the merge result.
        let merged = match next.iter().position(|f| f.id == merged.id) {
            Some(existing) => {
                let mut folded = combine(&next[existing], &merged)?;
                folded.id = next[existing].id.clone();
                next[existing] = folded.clone();
                folded
            }
            None => {
                next.push(merged.clone());
                merged
            }
        };

        self.persist(&next)?;
        self.faces = next;
        Ok(merged)
    }
}

/// Builds the record that replaces `a` and `b`.
///
/// The embedding is the samples-weighted midpoint; the radius grows to cover
/// both inputs including their own spread.
fn combine(a: &FaceRecord, b: &FaceRecord) -> Result<FaceRecord, StoreError> {
    if a.subject_id != b.subject_id {
        return Err(StoreError::ConflictingSubjects {
            a: a.subject_id.clone(),
            b: b.subject_id.clone(),
        });
    }

    let embedding = math::weighted_midpoint(&[
        (a.embedding.as_slice(), a.samples.max(1) as f64),
        (b.embedding.as_slice(), b.samples.max(1) as f64),
    ])
    .ok_or(StoreError::DimensionMismatch {
        a: a.embedding.len(),
        b: b.embedding.len(),
    })?;

    let sample_radius = [a, b]
        .iter()
        .map(|f| {
            math::euclidean_distance(&embedding, &f.embedding).unwrap_or(0.0) + f.sample_radius
        })
        .fold(0.0, f64::max);

    Ok(FaceRecord {
        id: face_id(&a.subject_id, [&a.id, &b.id], &embedding),
        subject_id: a.subject_id.clone(),
        source: a.source,
        hidden: false,
        samples: a.samples.max(1).saturating_add(b.samples.max(1)),
        sample_radius,
        embedding,
    })
}

/// Id derived from the subject, the merged ids (order-independent) and the
/// embedding, so merges of different inputs never share an id.
fn face_id(subject_id: &str, input_ids: [&str; 2], embedding: &[f64]) -> String {
    let mut ids = input_ids;
    ids.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    hasher.update(subject_id.as_bytes());
    for id in ids {
        hasher.update(&[0]);
        hasher.update(id.as_bytes());
    }
    hasher.update(&[0]);
    for value in embedding {
        hasher.update(&value.to_le_bytes());
    }
    hasher.finalize().to_hex()[..FACE_ID_LENGTH].to_string()
}
