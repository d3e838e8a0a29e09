// src/matching/computer.rs - Aggregates voter outcomes into a match strength
use rayon::prelude::*;

use crate::error::{MatchingError, Result};
use crate::matching::voter::MatchVoter;
use crate::models::matching::{CandidatePair, MatchResult};

/// Tolerance when checking that additive weights sum to at most 1.
const WEIGHT_SUM_TOLERANCE: f32 = 1e-6;

/// How a positive vote changes the running strength of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrengthRecalculator {
    /// `min(1, s + w)`. Voter weights must sum to at most 1, so the cap is
    /// never reached before every voter has agreed.
    #[default]
    Additive,
    /// `s + (1 - s) * w`
    ProbabilisticOr,
    /// `max(s, w)`
    Maximum,
}

impl StrengthRecalculator {
    pub fn recalculate(&self, current: f32, weight: f32) -> f32 {
        match self {
            StrengthRecalculator::Additive => (current + weight).min(1.0),
            StrengthRecalculator::ProbabilisticOr => current + (1.0 - current) * weight,
            StrengthRecalculator::Maximum => current.max(weight),
        }
    }
}

/// Scores candidate pairs with a fixed, non-empty list of voters.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScoreComputer {
    voters: Vec<MatchVoter>,
    recalculator: StrengthRecalculator,
}

impl MatchScoreComputer {
    pub fn new(voters: Vec<MatchVoter>) -> Result<Self> {
        Self::with_recalculator(voters, StrengthRecalculator::default())
    }

    pub fn with_recalculator(voters: Vec<MatchVoter>, recalculator: StrengthRecalculator) -> Result<Self> {
        if voters.is_empty() {
            return Err(MatchingError::NoVoters("score computer".to_string()));
        }
        if recalculator == StrengthRecalculator::Additive {
            let total: f32 = voters.iter().map(MatchVoter::weight).sum();
            if total > 1.0 + WEIGHT_SUM_TOLERANCE {
                return Err(MatchingError::InvalidVoterConfig(format!(
                    "additive voter weights must sum to at most 1, got {:.3}",
                    total
                )));
            }
        }
        Ok(Self { voters, recalculator })
    }

    pub fn voters(&self) -> &[MatchVoter] {
        &self.voters
    }

    pub fn recalculator(&self) -> StrengthRecalculator {
        self.recalculator
    }

    /// Strength of a single pair; zero when no voter agrees.
    pub fn compute_strength(&self, pair: &CandidatePair<'_>) -> f32 {
        self.voters
            .iter()
            .filter(|voter| voter.vote_match(pair.affiliation, pair.organization))
            .fold(0.0, |strength, voter| {
                self.recalculator.recalculate(strength, voter.weight())
            })
    }

    /// Scores every pair and keeps those with a positive strength. Input
    /// order is preserved.
    pub fn compute_matches<'a>(&self, pairs: &[CandidatePair<'a>]) -> Vec<MatchResult<'a>> {
        pairs
            .par_iter()
            .filter_map(|pair| {
                let strength = self.compute_strength(pair);
                (strength > 0.0).then(|| MatchResult::from(*pair).with_match_strength(strength))
            })
            .collect()
    }
}

/// One-shot scoring. Fails before touching any pair when `voters` is empty.
pub fn compute_matches<'a>(
    pairs: &[CandidatePair<'a>],
    voters: &[MatchVoter],
    recalculator: StrengthRecalculator,
) -> Result<Vec<MatchResult<'a>>> {
    let computer = MatchScoreComputer::with_recalculator(voters.to_vec(), recalculator)?;
    Ok(computer.compute_matches(pairs))
}
