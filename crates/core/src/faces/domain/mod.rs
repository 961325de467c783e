pub mod face_matcher;
pub mod face_record;
pub mod face_store;
pub mod feature_gate;
