// src/matching/voter.rs - Boolean match predicates with fixed weights
use crate::error::{MatchingError, Result};
use crate::matching::similarity::{check_ratio, similar_word_ratio, WordSimilarity};
use crate::models::core::{Affiliation, OrgNameSource, Organization};
use crate::normalize::country::normalize_country_code;
use crate::normalize::text::{filter_chars, filter_chars_and_short_words, normalize_for_comparison};

/// Which side's words form the denominator of the common-words ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatioRelation {
    #[default]
    WithRegardToAffWords,
    WithRegardToOrgWords,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VoterKind {
    /// Affiliation name equals one of the organization names after filtering
    /// `chars_to_filter` and normalizing case and diacritics.
    StrictName {
        chars_to_filter: Vec<char>,
        name_source: OrgNameSource,
    },
    CommonWords {
        chars_to_filter: Vec<char>,
        word_to_remove_max_length: usize,
        min_common_words_ratio: f64,
        ratio_relation: RatioRelation,
        similarity: WordSimilarity,
        name_source: OrgNameSource,
    },
    /// Share of organization words that have a Jaro-Winkler-close word in the
    /// affiliation name.
    FittingOrgWords {
        chars_to_filter: Vec<char>,
        word_to_remove_max_length: usize,
        min_fitting_org_words_ratio: f64,
        min_fitting_word_similarity: f64,
        name_source: OrgNameSource,
    },
    CountryCodeStrict,
    /// Like `CountryCodeStrict`, but a missing code on either side also votes true.
    CountryCodeLoose,
    /// Votes true only when every nested voter does.
    Composite(Vec<VoterKind>),
}

impl VoterKind {
    pub fn strict_name(chars_to_filter: Vec<char>, name_source: OrgNameSource) -> Self {
        VoterKind::StrictName {
            chars_to_filter,
            name_source,
        }
    }

    pub fn common_words(
        chars_to_filter: Vec<char>,
        word_to_remove_max_length: usize,
        min_common_words_ratio: f64,
        ratio_relation: RatioRelation,
        similarity: WordSimilarity,
        name_source: OrgNameSource,
    ) -> Result<Self> {
        check_ratio("min_common_words_ratio", min_common_words_ratio)?;
        Ok(VoterKind::CommonWords {
            chars_to_filter,
            word_to_remove_max_length,
            min_common_words_ratio,
            ratio_relation,
            similarity,
            name_source,
        })
    }

    pub fn fitting_org_words(
        chars_to_filter: Vec<char>,
        word_to_remove_max_length: usize,
        min_fitting_org_words_ratio: f64,
        min_fitting_word_similarity: f64,
        name_source: OrgNameSource,
    ) -> Result<Self> {
        check_ratio("min_fitting_org_words_ratio", min_fitting_org_words_ratio)?;
        check_ratio("min_fitting_word_similarity", min_fitting_word_similarity)?;
        Ok(VoterKind::FittingOrgWords {
            chars_to_filter,
            word_to_remove_max_length,
            min_fitting_org_words_ratio,
            min_fitting_word_similarity,
            name_source,
        })
    }

    pub fn composite(voters: Vec<VoterKind>) -> Result<Self> {
        if voters.is_empty() {
            return Err(MatchingError::InvalidVoterConfig(
                "composite voter needs at least one nested voter".to_string(),
            ));
        }
        Ok(VoterKind::Composite(voters))
    }

    pub fn vote(&self, affiliation: &Affiliation, organization: &Organization) -> bool {
        match self {
            VoterKind::StrictName {
                chars_to_filter,
                name_source,
            } => {
                let aff_name = strict_form(&affiliation.organization_name, chars_to_filter);
                if aff_name.is_empty() {
                    return false;
                }
                organization
                    .names(*name_source)
                    .into_iter()
                    .any(|org_name| strict_form(org_name, chars_to_filter) == aff_name)
            }
            VoterKind::CommonWords {
                chars_to_filter,
                word_to_remove_max_length,
                min_common_words_ratio,
                ratio_relation,
                similarity,
                name_source,
            } => {
                let aff_words = words(&affiliation.organization_name, chars_to_filter, *word_to_remove_max_length);
                if aff_words.is_empty() {
                    return false;
                }
                organization.names(*name_source).into_iter().any(|org_name| {
                    let org_words = words(org_name, chars_to_filter, *word_to_remove_max_length);
                    if org_words.is_empty() {
                        return false;
                    }
                    let ratio = match ratio_relation {
                        RatioRelation::WithRegardToAffWords => {
                            similar_word_ratio(&aff_words, &org_words, similarity)
                        }
                        RatioRelation::WithRegardToOrgWords => {
                            similar_word_ratio(&org_words, &aff_words, similarity)
                        }
                    };
                    ratio >= *min_common_words_ratio
                })
            }
            VoterKind::FittingOrgWords {
                chars_to_filter,
                word_to_remove_max_length,
                min_fitting_org_words_ratio,
                min_fitting_word_similarity,
                name_source,
            } => {
                let aff_words = words(&affiliation.organization_name, chars_to_filter, *word_to_remove_max_length);
                if aff_words.is_empty() {
                    return false;
                }
                let similarity = WordSimilarity::JaroWinkler {
                    min_similarity: *min_fitting_word_similarity,
                };
                organization.names(*name_source).into_iter().any(|org_name| {
                    let org_words = words(org_name, chars_to_filter, *word_to_remove_max_length);
                    !org_words.is_empty()
                        && similar_word_ratio(&org_words, &aff_words, &similarity) >= *min_fitting_org_words_ratio
                })
            }
            VoterKind::CountryCodeStrict => {
                let (aff_code, org_code) = country_codes(affiliation, organization);
                !aff_code.is_empty() && aff_code == org_code
            }
            VoterKind::CountryCodeLoose => {
                let (aff_code, org_code) = country_codes(affiliation, organization);
                aff_code.is_empty() || org_code.is_empty() || aff_code == org_code
            }
            VoterKind::Composite(voters) => voters.iter().all(|v| v.vote(affiliation, organization)),
        }
    }
}

fn strict_form(name: &str, chars_to_filter: &[char]) -> String {
    normalize_for_comparison(&filter_chars(name, chars_to_filter))
}

fn words(name: &str, chars_to_filter: &[char], word_to_remove_max_length: usize) -> Vec<String> {
    filter_chars_and_short_words(&normalize_for_comparison(name), chars_to_filter, word_to_remove_max_length)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn country_codes(affiliation: &Affiliation, organization: &Organization) -> (String, String) {
    (
        normalize_country_code(affiliation.country_code.as_deref()),
        normalize_country_code(organization.country_code.as_deref()),
    )
}

/// A voter together with the weight it contributes when it votes true.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchVoter {
    kind: VoterKind,
    weight: f32,
}

impl MatchVoter {
    pub fn new(kind: VoterKind, weight: f32) -> Result<Self> {
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(MatchingError::InvalidVoterConfig(format!(
                "voter weight must be in (0, 1], got {}",
                weight
            )));
        }
        Ok(Self { kind, weight })
    }

    pub fn kind(&self) -> &VoterKind {
        &self.kind
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn vote_match(&self, affiliation: &Affiliation, organization: &Organization) -> bool {
        self.kind.vote(affiliation, organization)
    }
}
