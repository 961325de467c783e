pub mod json_face_store;
pub mod math;
pub mod radius_matcher;
