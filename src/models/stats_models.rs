// src/models/stats_models.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which matcher produced a set of results. Used for logging and statistics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatcherKind {
    DocOrgRelation,
    NameMainSection,
    AlternativeNameMainSection,
    ShortNameMainSection,
    FirstWords,
    Custom(String),
}

impl MatcherKind {
    pub fn as_str(&self) -> &str {
        match self {
            MatcherKind::DocOrgRelation => "doc_org_relation",
            MatcherKind::NameMainSection => "name_main_section",
            MatcherKind::AlternativeNameMainSection => "alt_name_main_section",
            MatcherKind::ShortNameMainSection => "short_name_main_section",
            MatcherKind::FirstWords => "first_words",
            MatcherKind::Custom(name) => name,
        }
    }
}

impl FromStr for MatcherKind {
    type Err = std::convert::Infallible;

    /// Known matcher names map to their variant, anything else to `Custom`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "doc_org_relation" => MatcherKind::DocOrgRelation,
            "name_main_section" => MatcherKind::NameMainSection,
            "alt_name_main_section" => MatcherKind::AlternativeNameMainSection,
            "short_name_main_section" => MatcherKind::ShortNameMainSection,
            "first_words" => MatcherKind::FirstWords,
            other => MatcherKind::Custom(other.to_string()),
        })
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherStats {
    pub matcher: MatcherKind,
    pub candidate_pairs: usize,
    pub match_results: usize,
    pub affiliations_matched: usize,
    pub avg_match_strength: f64,
    pub duration_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,
    pub total_affiliations: usize,
    pub total_organizations: usize,
    pub total_document_organizations: usize,
    pub total_final_matches: usize,
    pub matching_time: f64,
    pub matcher_stats: Vec<MatcherStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matcher_kind_names_round_trip() {
        for kind in [
            MatcherKind::DocOrgRelation,
            MatcherKind::NameMainSection,
            MatcherKind::AlternativeNameMainSection,
            MatcherKind::ShortNameMainSection,
            MatcherKind::FirstWords,
        ] {
            assert_eq!(kind.as_str().parse::<MatcherKind>().unwrap(), kind);
        }
        assert_eq!(
            " acronyms ".parse::<MatcherKind>().unwrap(),
            MatcherKind::Custom("acronyms".to_string())
        );
    }
}
