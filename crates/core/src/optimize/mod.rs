pub mod optimize_observer;
pub mod pair_merge_optimizer;
pub mod pair_outcome;
pub mod pairing;
pub mod subject_groups;
