// src/matching/mod.rs
pub mod chooser;
pub mod computer;
pub mod manager;
pub mod matcher;
pub mod presets;
pub mod similarity;
pub mod voter;

pub use chooser::{choose_better, pick_best_matches};
pub use computer::{compute_matches, MatchScoreComputer, StrengthRecalculator};
pub use manager::{MatchingEngine, MatchingOutcome};
pub use matcher::AffOrgMatcher;
pub use presets::default_matchers;
pub use similarity::WordSimilarity;
pub use voter::{MatchVoter, RatioRelation, VoterKind};
