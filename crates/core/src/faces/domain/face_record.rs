use serde::{Deserialize, Serialize};

/// How a face record entered the lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceSource {
    /// Confirmed by a person assigning the face to a subject.
    #[default]
    Manual,
    /// Produced by automatic clustering.
    Auto,
}

/// A stored face cluster with its identity-bearing embedding.
///
/// `subject_id` is empty for faces that have not been assigned to a subject;
/// those never take part in merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRecord {
    pub id: String,
    #[serde(default)]
    pub subject_id: String,
    pub embedding: Vec<f64>,
    #[serde(default)]
    pub source: FaceSource,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_samples")]
    pub samples: u32,
    #[serde(default)]
    pub sample_radius: f64,
}

fn default_samples() -> u32 {
    1
}

impl FaceRecord {
    /// Creates a manually confirmed single-sample record.
    pub fn new(id: impl Into<String>, subject_id: impl Into<String>, embedding: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            subject_id: subject_id.into(),
            embedding,
            source: FaceSource::Manual,
            hidden: false,
            samples: default_samples(),
            sample_radius: 0.0,
        }
    }

    pub fn has_subject(&self) -> bool {
        !self.subject_id.is_empty()
    }

    pub fn is_manual(&self) -> bool {
        self.source == FaceSource::Manual
    }
}
