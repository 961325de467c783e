use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::faces::domain::face_record::FaceRecord;

/// Order in which faces inside a subject group are paired up.
///
/// Greedy pairing picks the first match it meets, so this order decides
/// which pair wins when a face matches several others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairOrder {
    /// Stable sort by face id; reproducible across runs and stores.
    #[default]
    Id,
    /// Keep the order the store returned.
    Fetched,
}

impl fmt::Display for PairOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairOrder::Id => write!(f, "id"),
            PairOrder::Fetched => write!(f, "fetched"),
        }
    }
}

impl FromStr for PairOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(PairOrder::Id),
            "fetched" => Ok(PairOrder::Fetched),
            other => Err(format!("Pair order must be 'id' or 'fetched', got '{other}'")),
        }
    }
}

/// Faces sharing one subject. Rebuilt on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectGroup {
    pub subject_id: String,
    pub faces: Vec<FaceRecord>,
}

/// Partitions faces by subject in one pass, dropping unassigned faces.
///
/// Groups come back sorted by subject id.
pub fn group_by_subject(faces: Vec<FaceRecord>, order: PairOrder) -> Vec<SubjectGroup> {
    let mut groups: BTreeMap<String, Vec<FaceRecord>> = BTreeMap::new();
    for face in faces {
        if !face.has_subject() {
            continue;
        }
        groups.entry(face.subject_id.clone()).or_default().push(face);
    }

    groups
        .into_iter()
        .map(|(subject_id, mut faces)| {
            if order == PairOrder::Id {
                faces.sort_by(|a, b| a.id.cmp(&b.id));
            }
            SubjectGroup { subject_id, faces }
        })
        .collect()
}
