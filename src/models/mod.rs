// src/models/mod.rs
pub mod core;
pub mod matching;
pub mod stats_models;

pub use self::core::{
    Affiliation, AffiliationKey, DocumentOrganization, DocumentProject, OrgNameSource,
    Organization, ProjectOrganization,
};
pub use self::matching::{CandidatePair, FinalMatch, MatchResult, MatchedOrganization};
pub use self::stats_models::{MatcherKind, MatcherStats, RunSummary};
