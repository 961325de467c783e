use std::path::PathBuf;

use thiserror::Error;

use crate::faces::domain::face_record::FaceRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read faces from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write faces to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed face data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("face {0} not found")]
    UnknownFace(String),
    #[error("cannot merge face {0} with itself")]
    SameFace(String),
    #[error("cannot merge clusters with conflicting subjects {a} <> {b}")]
    ConflictingSubjects { a: String, b: String },
    #[error("embedding dimensions differ: {a} vs {b}")]
    DimensionMismatch { a: usize, b: usize },
}

/// Persistent storage for face records.
///
/// This is a port: the optimizer reads candidates and requests merges through
/// it without knowing how faces are stored.
pub trait FaceStore: Send {
    /// Returns faces that are not hidden, optionally only manually confirmed ones.
    fn fetch_eligible(&self, manual_only: bool) -> Result<Vec<FaceRecord>, StoreError>;

    /// Combines two faces into a single surviving record.
    ///
    /// On error neither input may be altered.
    fn merge_faces(&mut self, faces: [&FaceRecord; 2]) -> Result<FaceRecord, StoreError>;
}
