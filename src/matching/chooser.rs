// src/matching/chooser.rs - Picks one organization per affiliation occurrence
use std::collections::BTreeMap;

use crate::models::core::AffiliationKey;
use crate::models::matching::{FinalMatch, MatchResult};

/// The strictly stronger of two results. On a tie the left one wins.
pub fn choose_better<'r, 'a>(a: &'r MatchResult<'a>, b: &'r MatchResult<'a>) -> &'r MatchResult<'a> {
    if b.match_strength > a.match_strength {
        b
    } else {
        a
    }
}

/// Reduces results to a single best match per `(document_id, position)`.
///
/// Each group is folded in the order the results arrive, so among equally
/// strong results the earliest one is kept. Output is ordered by affiliation
/// identity.
pub fn pick_best_matches(results: &[MatchResult<'_>]) -> Vec<FinalMatch> {
    let mut best: BTreeMap<AffiliationKey, &MatchResult<'_>> = BTreeMap::new();
    for result in results {
        best.entry(result.affiliation_key())
            .and_modify(|current| *current = choose_better(*current, result))
            .or_insert(result);
    }
    best.into_values().map(FinalMatch::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::{Affiliation, Organization};

    #[test]
    fn test_stronger_result_wins() {
        let aff = Affiliation::new("DOC_A", 1);
        let org_a = Organization::new("ORG_A");
        let org_b = Organization::new("ORG_B");
        let results = vec![
            MatchResult::new(&aff, &org_b, 0.7),
            MatchResult::new(&aff, &org_a, 0.8),
        ];

        let best = pick_best_matches(&results);

        assert_eq!(best.len(), 1);
        assert_eq!(best[0].document_id, "DOC_A");
        assert_eq!(best[0].position, 1);
        assert_eq!(best[0].organization_id, "ORG_A");
        assert_eq!(best[0].match_strength, 0.8);
    }

    #[test]
    fn test_tie_keeps_first() {
        let aff = Affiliation::new("DOC1", 1);
        let org_1 = Organization::new("ORG_1");
        let org_2 = Organization::new("ORG_2");
        let first = MatchResult::new(&aff, &org_1, 0.6);
        let second = MatchResult::new(&aff, &org_2, 0.6);

        assert_eq!(choose_better(&first, &second).organization.id, "ORG_1");
        assert_eq!(choose_better(&second, &first).organization.id, "ORG_2");
        assert_eq!(pick_best_matches(&[first, second])[0].organization_id, "ORG_1");
    }

    #[test]
    fn test_one_match_per_affiliation_ordered_by_key() {
        let aff_b0 = Affiliation::new("DOC_B", 0);
        let aff_a1 = Affiliation::new("DOC_A", 1);
        let aff_a0 = Affiliation::new("DOC_A", 0);
        let org = Organization::new("ORG");
        let results = vec![
            MatchResult::new(&aff_b0, &org, 0.5),
            MatchResult::new(&aff_a1, &org, 0.4),
            MatchResult::new(&aff_a1, &org, 0.9),
            MatchResult::new(&aff_a0, &org, 0.2),
        ];

        let best = pick_best_matches(&results);
        let keys: Vec<(&str, u32)> = best.iter().map(|m| (m.document_id.as_str(), m.position)).collect();
        assert_eq!(keys, vec![("DOC_A", 0), ("DOC_A", 1), ("DOC_B", 0)]);
        assert_eq!(best[1].match_strength, 0.9);
        assert!(pick_best_matches(&[]).is_empty());
    }
}
