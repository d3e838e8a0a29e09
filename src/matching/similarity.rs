// src/matching/similarity.rs - Word-level fuzzy comparison used by voters
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::error::{MatchingError, Result};

/// Decides whether two words are "the same word" for the word-overlap voters.
#[derive(Debug, Clone, PartialEq)]
pub enum WordSimilarity {
    Exact,
    JaroWinkler { min_similarity: f64 },
    NormalizedLevenshtein { min_similarity: f64 },
    /// The shorter word is a prefix of the longer one and has at least
    /// `min_prefix_len` characters ("univ" ~ "university").
    Prefix { min_prefix_len: usize },
}

impl WordSimilarity {
    pub fn jaro_winkler(min_similarity: f64) -> Result<Self> {
        check_ratio("min_similarity", min_similarity)?;
        Ok(WordSimilarity::JaroWinkler { min_similarity })
    }

    pub fn normalized_levenshtein(min_similarity: f64) -> Result<Self> {
        check_ratio("min_similarity", min_similarity)?;
        Ok(WordSimilarity::NormalizedLevenshtein { min_similarity })
    }

    pub fn prefix(min_prefix_len: usize) -> Result<Self> {
        if min_prefix_len == 0 {
            return Err(MatchingError::InvalidVoterConfig(
                "min_prefix_len must be at least 1".to_string(),
            ));
        }
        Ok(WordSimilarity::Prefix { min_prefix_len })
    }

    pub fn is_similar(&self, a: &str, b: &str) -> bool {
        if a.is_empty() || b.is_empty() {
            return false;
        }
        match self {
            WordSimilarity::Exact => a == b,
            WordSimilarity::JaroWinkler { min_similarity } => jaro_winkler(a, b) >= *min_similarity,
            WordSimilarity::NormalizedLevenshtein { min_similarity } => {
                normalized_levenshtein(a, b) >= *min_similarity
            }
            WordSimilarity::Prefix { min_prefix_len } => {
                let (shorter, longer) = if a.chars().count() <= b.chars().count() {
                    (a, b)
                } else {
                    (b, a)
                };
                shorter.chars().count() >= *min_prefix_len && longer.starts_with(shorter)
            }
        }
    }
}

/// Ratio thresholds must lie in (0, 1].
pub fn check_ratio(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(MatchingError::InvalidVoterConfig(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )))
    }
}

pub fn contains_similar_word<S: AsRef<str>>(words: &[S], word: &str, similarity: &WordSimilarity) -> bool {
    words.iter().any(|w| similarity.is_similar(w.as_ref(), word))
}

/// Share of `find_words` that have a similar counterpart in `in_words`.
/// Zero when there is nothing to find.
pub fn similar_word_ratio<S: AsRef<str>>(find_words: &[S], in_words: &[S], similarity: &WordSimilarity) -> f64 {
    if find_words.is_empty() {
        return 0.0;
    }
    let found = find_words
        .iter()
        .filter(|w| contains_similar_word(in_words, w.as_ref(), similarity))
        .count();
    found as f64 / find_words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact() {
        assert!(WordSimilarity::Exact.is_similar("toronto", "toronto"));
        assert!(!WordSimilarity::Exact.is_similar("toronto", "torontos"));
        assert!(!WordSimilarity::Exact.is_similar("", ""));
    }

    #[test]
    fn test_jaro_winkler_tolerates_typos() {
        let sim = WordSimilarity::jaro_winkler(0.9).unwrap();
        assert!(sim.is_similar("university", "universty"));
        assert!(!sim.is_similar("ohio", "state"));
    }

    #[test]
    fn test_normalized_levenshtein() {
        let sim = WordSimilarity::normalized_levenshtein(0.8).unwrap();
        assert!(sim.is_similar("technology", "technologie"));
        assert!(!sim.is_similar("physics", "chemistry"));
    }

    #[test]
    fn test_prefix() {
        let sim = WordSimilarity::prefix(4).unwrap();
        assert!(sim.is_similar("univ", "university"));
        assert!(sim.is_similar("university", "univ"));
        assert!(!sim.is_similar("uni", "university"));
        assert!(!sim.is_similar("inst", "university"));
    }

    #[test]
    fn test_invalid_thresholds() {
        assert!(WordSimilarity::jaro_winkler(0.0).is_err());
        assert!(WordSimilarity::jaro_winkler(1.1).is_err());
        assert!(WordSimilarity::normalized_levenshtein(-0.5).is_err());
        assert!(WordSimilarity::prefix(0).is_err());
        assert!(WordSimilarity::jaro_winkler(1.0).is_ok());
    }

    #[test]
    fn test_similar_word_ratio() {
        let aff = ["department", "chemistry", "university", "toronto"];
        let org = ["university", "toronto"];
        let exact = WordSimilarity::Exact;

        assert_eq!(similar_word_ratio(&org, &aff, &exact), 1.0);
        assert_eq!(similar_word_ratio(&aff, &org, &exact), 0.5);
        assert_eq!(similar_word_ratio::<&str>(&[], &org, &exact), 0.0);
    }
}
