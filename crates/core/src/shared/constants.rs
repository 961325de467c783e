/// Distance added to a face's sample radius when matching embeddings.
pub const DEFAULT_MATCH_DIST: f64 = 0.46;

/// Number of hex digits kept from the embedding hash for merged face ids.
pub const FACE_ID_LENGTH: usize = 32;

pub const SETTINGS_DIR_NAME: &str = "FaceMerge";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
