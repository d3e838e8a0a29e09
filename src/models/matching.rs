// src/models/matching.rs - Transient records produced while matching
use serde::{Deserialize, Serialize};

use crate::models::core::{Affiliation, AffiliationKey, Organization};

/// A joined affiliation/organization pair awaiting scoring.
#[derive(Debug, Clone, Copy)]
pub struct CandidatePair<'a> {
    pub affiliation: &'a Affiliation,
    pub organization: &'a Organization,
}

impl<'a> CandidatePair<'a> {
    pub fn new(affiliation: &'a Affiliation, organization: &'a Organization) -> Self {
        Self {
            affiliation,
            organization,
        }
    }
}

/// A scored pair. Several results may exist per affiliation before selection.
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    pub affiliation: &'a Affiliation,
    pub organization: &'a Organization,
    pub match_strength: f32,
}

impl<'a> MatchResult<'a> {
    pub fn new(affiliation: &'a Affiliation, organization: &'a Organization, match_strength: f32) -> Self {
        Self {
            affiliation,
            organization,
            match_strength,
        }
    }

    pub fn with_match_strength(self, match_strength: f32) -> Self {
        Self {
            match_strength,
            ..self
        }
    }

    pub fn affiliation_key(&self) -> AffiliationKey {
        self.affiliation.key()
    }
}

impl<'a> From<CandidatePair<'a>> for MatchResult<'a> {
    fn from(pair: CandidatePair<'a>) -> Self {
        MatchResult::new(pair.affiliation, pair.organization, 0.0)
    }
}

/// The single organization chosen for one affiliation occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalMatch {
    pub document_id: String,
    pub position: u32,
    pub organization_id: String,
    pub match_strength: f32,
}

impl From<&MatchResult<'_>> for FinalMatch {
    fn from(result: &MatchResult<'_>) -> Self {
        Self {
            document_id: result.affiliation.document_id.clone(),
            position: result.affiliation.position,
            organization_id: result.organization.id.clone(),
            match_strength: result.match_strength,
        }
    }
}

/// Output record handed to the result sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedOrganization {
    pub document_id: String,
    pub organization_id: String,
    pub match_strength: f32,
}

impl From<&FinalMatch> for MatchedOrganization {
    fn from(m: &FinalMatch) -> Self {
        Self {
            document_id: m.document_id.clone(),
            organization_id: m.organization_id.clone(),
            match_strength: m.match_strength,
        }
    }
}
