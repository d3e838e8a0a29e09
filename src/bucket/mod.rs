// src/bucket/mod.rs
pub mod hasher;
pub mod joiner;
pub mod partition;

pub use hasher::{AffiliationBucketHasher, HashStrategy, OrganizationBucketHasher};
pub use joiner::CandidateJoiner;
