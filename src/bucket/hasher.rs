// src/bucket/hasher.rs - Bucket keys that restrict which pairs get compared
use std::collections::BTreeSet;

use crate::error::{MatchingError, Result};
use crate::models::core::{Affiliation, OrgNameSource, Organization};
use crate::normalize::text::{main_section_tokens, normalize_name, tokenize_name};

/// How a single name is turned into a bucket key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashStrategy {
    /// First letters of the main-section words, e.g. "Department of Chemistry,
    /// University of Toronto" -> "ut". A single-word main section is kept
    /// whole, so an acronym like "MIT" hashes to "mit".
    MainSectionFirstLetters {
        letters_per_word: usize,
        max_words: Option<usize>,
    },
    /// The first `word_count` normalized words, space separated.
    FirstWords { word_count: usize },
    /// The whole normalized name without spaces, for short names like "MIT".
    Acronym,
}

impl Default for HashStrategy {
    fn default() -> Self {
        HashStrategy::MainSectionFirstLetters {
            letters_per_word: 1,
            max_words: None,
        }
    }
}

impl HashStrategy {
    pub fn main_section_first_letters(letters_per_word: usize, max_words: Option<usize>) -> Result<Self> {
        if letters_per_word == 0 {
            return Err(MatchingError::InvalidHasherConfig(
                "letters_per_word must be at least 1".to_string(),
            ));
        }
        if max_words == Some(0) {
            return Err(MatchingError::InvalidHasherConfig(
                "max_words must be at least 1 when set".to_string(),
            ));
        }
        Ok(HashStrategy::MainSectionFirstLetters {
            letters_per_word,
            max_words,
        })
    }

    pub fn first_words(word_count: usize) -> Result<Self> {
        if word_count == 0 {
            return Err(MatchingError::InvalidHasherConfig(
                "word_count must be at least 1".to_string(),
            ));
        }
        Ok(HashStrategy::FirstWords { word_count })
    }

    /// Bucket key of one name, or `None` when the name is empty or yields no
    /// usable tokens (the empty bucket never joins).
    pub fn hash_name(&self, name: &str) -> Option<String> {
        let key = match self {
            HashStrategy::MainSectionFirstLetters {
                letters_per_word,
                max_words,
            } => {
                let tokens = main_section_tokens(name);
                if let [single] = tokens.as_slice() {
                    return Some(single.clone());
                }
                let word_limit = max_words.unwrap_or(tokens.len());
                tokens
                    .iter()
                    .take(word_limit)
                    .flat_map(|token| token.chars().take(*letters_per_word))
                    .collect::<String>()
            }
            HashStrategy::FirstWords { word_count } => tokenize_name(name)
                .into_iter()
                .take(*word_count)
                .collect::<Vec<_>>()
                .join(" "),
            HashStrategy::Acronym => normalize_name(name).split_whitespace().collect::<String>(),
        };
        (!key.is_empty()).then_some(key)
    }
}

/// Computes the bucket key of an affiliation's organization name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffiliationBucketHasher {
    strategy: HashStrategy,
}

impl AffiliationBucketHasher {
    pub fn new(strategy: HashStrategy) -> Self {
        Self { strategy }
    }

    pub fn hash(&self, affiliation: &Affiliation) -> Vec<String> {
        self.strategy
            .hash_name(&affiliation.organization_name)
            .into_iter()
            .collect()
    }
}

/// Computes bucket keys for the selected names of an organization. An
/// organization with several alternative names may land in several buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationBucketHasher {
    strategy: HashStrategy,
    name_source: OrgNameSource,
}

impl OrganizationBucketHasher {
    pub fn new(strategy: HashStrategy, name_source: OrgNameSource) -> Self {
        Self {
            strategy,
            name_source,
        }
    }

    pub fn hash(&self, organization: &Organization) -> Vec<String> {
        organization
            .names(self.name_source)
            .into_iter()
            .filter_map(|name| self.strategy.hash_name(name))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_section_first_letters() {
        let strategy = HashStrategy::default();
        assert_eq!(
            strategy.hash_name("Department of Chemistry, University of Toronto").as_deref(),
            Some("ut")
        );
        assert_eq!(strategy.hash_name("University of Toronto").as_deref(), Some("ut"));
        assert_eq!(
            strategy.hash_name("Massachusetts Institute of Technology").as_deref(),
            Some("mit")
        );
    }

    #[test]
    fn test_single_word_main_section_is_kept_whole() {
        let strategy = HashStrategy::default();
        assert_eq!(strategy.hash_name("MIT").as_deref(), Some("mit"));
        assert_eq!(strategy.hash_name("Dept. of Physics, MIT").as_deref(), Some("mit"));
    }

    #[test]
    fn test_main_section_letters_and_word_limits() {
        let strategy = HashStrategy::main_section_first_letters(2, Some(2)).unwrap();
        assert_eq!(
            strategy.hash_name("Massachusetts Institute of Technology").as_deref(),
            Some("main")
        );
    }

    #[test]
    fn test_hash_is_idempotent() {
        let strategy = HashStrategy::default();
        let name = "Uniwersytet Łódzki, Wydział Fizyki";
        assert_eq!(strategy.hash_name(name), strategy.hash_name(name));
    }

    #[test]
    fn test_first_words() {
        let strategy = HashStrategy::first_words(2).unwrap();
        assert_eq!(
            strategy.hash_name("The University of Texas at Austin").as_deref(),
            Some("university texas")
        );
    }

    #[test]
    fn test_acronym() {
        assert_eq!(HashStrategy::Acronym.hash_name(" M.I.T. ").as_deref(), Some("mit"));
    }

    #[test]
    fn test_empty_names_have_no_bucket() {
        for strategy in [
            HashStrategy::default(),
            HashStrategy::first_words(3).unwrap(),
            HashStrategy::Acronym,
        ] {
            assert_eq!(strategy.hash_name(""), None);
            assert_eq!(strategy.hash_name(" ,;. "), None);
        }
    }

    #[test]
    fn test_invalid_strategies_rejected() {
        assert!(HashStrategy::main_section_first_letters(0, None).is_err());
        assert!(HashStrategy::main_section_first_letters(1, Some(0)).is_err());
        assert!(HashStrategy::first_words(0).is_err());
    }

    #[test]
    fn test_organization_hasher_uses_selected_names() {
        let org = Organization::new("ORG1")
            .with_name("Politechnika Warszawska")
            .with_short_name("PW")
            .with_alternative_names(["Warsaw University of Technology", "Warsaw Univ. of Technology"]);

        let short = OrganizationBucketHasher::new(HashStrategy::Acronym, OrgNameSource::ShortName);
        assert_eq!(short.hash(&org), vec!["pw"]);

        let alt = OrganizationBucketHasher::new(HashStrategy::default(), OrgNameSource::AlternativeNames);
        assert_eq!(alt.hash(&org), vec!["wut"]);
    }

    #[test]
    fn test_affiliation_hasher_empty_name() {
        let hasher = AffiliationBucketHasher::default();
        assert!(hasher.hash(&Affiliation::new("DOC1", 0)).is_empty());
    }
}
