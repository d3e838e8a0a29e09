// src/matching/presets.rs - Default matcher set with calibrated voter weights
use crate::bucket::hasher::{AffiliationBucketHasher, HashStrategy, OrganizationBucketHasher};
use crate::bucket::joiner::CandidateJoiner;
use crate::error::{MatchingError, Result};
use crate::matching::computer::MatchScoreComputer;
use crate::matching::matcher::AffOrgMatcher;
use crate::matching::similarity::WordSimilarity;
use crate::matching::voter::{MatchVoter, RatioRelation, VoterKind};
use crate::models::core::OrgNameSource;
use crate::models::stats_models::MatcherKind;
use crate::utils::constants::{NAME_FILTER_CHARS, SHORT_WORD_MAX_LENGTH};

/// Execution order of the default matchers.
pub const DEFAULT_MATCHER_ORDER: [MatcherKind; 5] = [
    MatcherKind::DocOrgRelation,
    MatcherKind::NameMainSection,
    MatcherKind::AlternativeNameMainSection,
    MatcherKind::ShortNameMainSection,
    MatcherKind::FirstWords,
];

fn strict_name(name_source: OrgNameSource) -> VoterKind {
    VoterKind::strict_name(NAME_FILTER_CHARS.to_vec(), name_source)
}

fn fitting_org_words(min_ratio: f64, min_similarity: f64, name_source: OrgNameSource) -> Result<VoterKind> {
    VoterKind::fitting_org_words(
        NAME_FILTER_CHARS.to_vec(),
        SHORT_WORD_MAX_LENGTH,
        min_ratio,
        min_similarity,
        name_source,
    )
}

fn common_words(
    min_ratio: f64,
    ratio_relation: RatioRelation,
    similarity: WordSimilarity,
    name_source: OrgNameSource,
) -> Result<VoterKind> {
    VoterKind::common_words(
        NAME_FILTER_CHARS.to_vec(),
        SHORT_WORD_MAX_LENGTH,
        min_ratio,
        ratio_relation,
        similarity,
        name_source,
    )
}

/// Voters for matchers whose candidates share a name-derived bucket. Weights
/// sum to 1; an exact name outweighs all word-overlap voters together.
fn name_voters(name_source: OrgNameSource) -> Result<Vec<MatchVoter>> {
    Ok(vec![
        MatchVoter::new(strict_name(name_source), 0.5)?,
        MatchVoter::new(fitting_org_words(0.8, 0.9, name_source)?, 0.25)?,
        MatchVoter::new(
            common_words(
                0.8,
                RatioRelation::WithRegardToOrgWords,
                WordSimilarity::jaro_winkler(0.95)?,
                name_source,
            )?,
            0.2,
        )?,
        MatchVoter::new(
            VoterKind::composite(vec![
                common_words(0.5, RatioRelation::WithRegardToOrgWords, WordSimilarity::Exact, name_source)?,
                VoterKind::CountryCodeStrict,
            ])?,
            0.05,
        )?,
    ])
}

/// Affiliations against the organizations related to their document. The
/// relation already narrows the candidates, so looser word overlap counts.
pub fn doc_org_relation_matcher() -> Result<AffOrgMatcher> {
    let voters = vec![
        MatchVoter::new(strict_name(OrgNameSource::Name), 0.4)?,
        MatchVoter::new(strict_name(OrgNameSource::ShortName), 0.3)?,
        MatchVoter::new(fitting_org_words(0.8, 0.85, OrgNameSource::Name)?, 0.15)?,
        MatchVoter::new(
            common_words(
                0.7,
                RatioRelation::WithRegardToOrgWords,
                WordSimilarity::jaro_winkler(0.9)?,
                OrgNameSource::AlternativeNames,
            )?,
            0.1,
        )?,
        MatchVoter::new(
            common_words(
                0.3,
                RatioRelation::WithRegardToAffWords,
                WordSimilarity::prefix(4)?,
                OrgNameSource::Name,
            )?,
            0.05,
        )?,
    ];
    Ok(AffOrgMatcher::new(
        MatcherKind::DocOrgRelation,
        CandidateJoiner::DocOrgRelation,
        MatchScoreComputer::new(voters)?,
    ))
}

pub fn name_main_section_matcher() -> Result<AffOrgMatcher> {
    Ok(AffOrgMatcher::new(
        MatcherKind::NameMainSection,
        CandidateJoiner::hash_bucket(
            AffiliationBucketHasher::default(),
            OrganizationBucketHasher::new(HashStrategy::default(), OrgNameSource::Name),
        ),
        MatchScoreComputer::new(name_voters(OrgNameSource::Name)?)?,
    ))
}

pub fn alternative_name_main_section_matcher() -> Result<AffOrgMatcher> {
    Ok(AffOrgMatcher::new(
        MatcherKind::AlternativeNameMainSection,
        CandidateJoiner::hash_bucket(
            AffiliationBucketHasher::default(),
            OrganizationBucketHasher::new(HashStrategy::default(), OrgNameSource::AlternativeNames),
        ),
        MatchScoreComputer::new(name_voters(OrgNameSource::AlternativeNames)?)?,
    ))
}

/// Affiliation main-section initials against organization short names, so
/// "Massachusetts Institute of Technology" meets "MIT".
pub fn short_name_main_section_matcher() -> Result<AffOrgMatcher> {
    let voters = vec![
        MatchVoter::new(strict_name(OrgNameSource::ShortName), 0.5)?,
        MatchVoter::new(fitting_org_words(0.8, 0.9, OrgNameSource::Name)?, 0.3)?,
        MatchVoter::new(
            VoterKind::composite(vec![
                common_words(0.5, RatioRelation::WithRegardToAffWords, WordSimilarity::Exact, OrgNameSource::Name)?,
                VoterKind::CountryCodeLoose,
            ])?,
            0.2,
        )?,
    ];
    Ok(AffOrgMatcher::new(
        MatcherKind::ShortNameMainSection,
        CandidateJoiner::hash_bucket(
            AffiliationBucketHasher::default(),
            OrganizationBucketHasher::new(HashStrategy::Acronym, OrgNameSource::ShortName),
        ),
        MatchScoreComputer::new(voters)?,
    ))
}

/// Fallback on the leading words of the name. Without a strict-name voter its
/// strengths stay below an exact match found by the name matchers.
pub fn first_words_matcher() -> Result<AffOrgMatcher> {
    let strategy = HashStrategy::first_words(2)?;
    let voters = vec![
        MatchVoter::new(fitting_org_words(0.8, 0.9, OrgNameSource::Name)?, 0.4)?,
        MatchVoter::new(
            common_words(
                0.8,
                RatioRelation::WithRegardToAffWords,
                WordSimilarity::jaro_winkler(0.95)?,
                OrgNameSource::Name,
            )?,
            0.3,
        )?,
    ];
    Ok(AffOrgMatcher::new(
        MatcherKind::FirstWords,
        CandidateJoiner::hash_bucket(
            AffiliationBucketHasher::new(strategy.clone()),
            OrganizationBucketHasher::new(strategy, OrgNameSource::Name),
        ),
        MatchScoreComputer::new(voters)?,
    ))
}

/// Builds the preset matcher of the given kind. `Custom` kinds have no preset.
pub fn preset_matcher(kind: &MatcherKind) -> Result<AffOrgMatcher> {
    match kind {
        MatcherKind::DocOrgRelation => doc_org_relation_matcher(),
        MatcherKind::NameMainSection => name_main_section_matcher(),
        MatcherKind::AlternativeNameMainSection => alternative_name_main_section_matcher(),
        MatcherKind::ShortNameMainSection => short_name_main_section_matcher(),
        MatcherKind::FirstWords => first_words_matcher(),
        MatcherKind::Custom(name) => Err(MatchingError::InvalidEngineConfig(format!(
            "no preset matcher named '{}'",
            name
        ))),
    }
}

pub fn default_matchers() -> Result<Vec<AffOrgMatcher>> {
    DEFAULT_MATCHER_ORDER.iter().map(preset_matcher).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matchers_build_in_order() {
        let matchers = default_matchers().unwrap();
        let kinds: Vec<&MatcherKind> = matchers.iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, DEFAULT_MATCHER_ORDER.iter().collect::<Vec<_>>());
        assert!(matchers.iter().all(|m| !m.computer().voters().is_empty()));
        assert_eq!(matchers[0].joiner(), &CandidateJoiner::DocOrgRelation);
    }

    #[test]
    fn test_preset_weights_sum_to_at_most_one() {
        for matcher in default_matchers().unwrap() {
            let total: f32 = matcher.computer().voters().iter().map(|v| v.weight()).sum();
            assert!(total <= 1.0 + 1e-6, "{} weights sum to {}", matcher.kind(), total);
        }
    }

    #[test]
    fn test_custom_kind_has_no_preset() {
        let err = preset_matcher(&MatcherKind::Custom("acronyms".to_string())).unwrap_err();
        assert!(matches!(err, MatchingError::InvalidEngineConfig(_)));
    }
}
