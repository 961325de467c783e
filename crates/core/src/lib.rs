pub mod faces;
pub mod optimize;
pub mod shared;
