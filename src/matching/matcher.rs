// src/matching/matcher.rs - A named joiner + score computer pair
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::time::Instant;

use crate::bucket::joiner::CandidateJoiner;
use crate::matching::computer::MatchScoreComputer;
use crate::models::core::{Affiliation, DocumentOrganization, Organization};
use crate::models::matching::MatchResult;
use crate::models::stats_models::{MatcherKind, MatcherStats};
use crate::utils::progress_bars::logging::MatchingLogger;

/// Steps reported on a matcher's progress bar: join, score.
pub const MATCHER_STEPS: u64 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct AffOrgMatcher {
    kind: MatcherKind,
    joiner: CandidateJoiner,
    computer: MatchScoreComputer,
}

pub struct MatcherOutput<'a> {
    pub results: Vec<MatchResult<'a>>,
    pub stats: MatcherStats,
}

impl AffOrgMatcher {
    pub fn new(kind: MatcherKind, joiner: CandidateJoiner, computer: MatchScoreComputer) -> Self {
        Self { kind, joiner, computer }
    }

    pub fn kind(&self) -> &MatcherKind {
        &self.kind
    }

    pub fn joiner(&self) -> &CandidateJoiner {
        &self.joiner
    }

    pub fn computer(&self) -> &MatchScoreComputer {
        &self.computer
    }

    /// Joins candidates and scores them. Results keep the joiner's order.
    pub fn match_affiliations<'a>(
        &self,
        run_id: &str,
        affiliations: &'a [Affiliation],
        organizations: &'a [Organization],
        document_organizations: &'a [DocumentOrganization],
        partitions: usize,
        pb: Option<&ProgressBar>,
    ) -> MatcherOutput<'a> {
        let logger = MatchingLogger::new(&self.kind);
        let start = Instant::now();
        logger.log_start(run_id, self.computer.voters().len());

        logger.log_phase("Candidate join", Some(&format!("{} partitions", partitions)));
        let pairs = self
            .joiner
            .join(affiliations, organizations, document_organizations, partitions);
        logger.log_candidates(pairs.len(), affiliations.len());
        if pairs.is_empty() && !affiliations.is_empty() {
            logger.log_warning("No candidate pairs produced");
        }
        if let Some(pb) = pb {
            pb.inc(1);
            pb.set_message(format!("{}: scoring {} pairs", self.kind, pairs.len()));
        }

        logger.log_phase("Scoring", None);
        let results = self.computer.compute_matches(&pairs);
        logger.log_scoring_results(pairs.len(), results.len());
        if let Some(pb) = pb {
            pb.inc(1);
            pb.finish_with_message(format!("{}: {} results", self.kind, results.len()));
        }

        let affiliations_matched = results
            .iter()
            .map(|r| r.affiliation_key())
            .collect::<HashSet<_>>()
            .len();
        let avg_match_strength = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.match_strength as f64).sum::<f64>() / results.len() as f64
        };

        logger.log_debug(&format!("{} distinct affiliations with results", affiliations_matched));
        let stats = MatcherStats {
            matcher: self.kind.clone(),
            candidate_pairs: pairs.len(),
            match_results: results.len(),
            affiliations_matched,
            avg_match_strength,
            duration_secs: start.elapsed().as_secs_f64(),
        };
        logger.log_completion(&stats);

        MatcherOutput { results, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::hasher::{AffiliationBucketHasher, OrganizationBucketHasher};
    use crate::matching::voter::{MatchVoter, VoterKind};
    use crate::models::core::OrgNameSource;

    #[test]
    fn test_matcher_scores_joined_pairs() {
        let affiliations = vec![
            Affiliation::new("DOC1", 0).with_organization_name("University of Toronto"),
            Affiliation::new("DOC1", 1).with_organization_name("University of Tartu"),
            Affiliation::new("DOC2", 0).with_organization_name("Unknown Institute"),
        ];
        let organizations = vec![
            Organization::new("ORG_UT").with_name("University of Toronto"),
            Organization::new("ORG_TARTU").with_name("University of Tartu"),
        ];
        let computer = MatchScoreComputer::new(vec![MatchVoter::new(
            VoterKind::strict_name(vec![','], OrgNameSource::Name),
            1.0,
        )
        .unwrap()])
        .unwrap();
        let matcher = AffOrgMatcher::new(
            MatcherKind::NameMainSection,
            CandidateJoiner::hash_bucket(AffiliationBucketHasher::default(), OrganizationBucketHasher::default()),
            computer,
        );

        let output = matcher.match_affiliations("test-run", &affiliations, &organizations, &[], 2, None);

        // Toronto and Tartu share the "ut" bucket: 2 affiliations x 2 organizations
        assert_eq!(output.stats.candidate_pairs, 4);
        assert_eq!(output.stats.match_results, 2);
        assert_eq!(output.stats.affiliations_matched, 2);
        assert!((output.stats.avg_match_strength - 1.0).abs() < 1e-9);
        for result in &output.results {
            assert_eq!(result.affiliation.organization_name, result.organization.name);
        }
    }
}
