// src/bucket/joiner.rs - Candidate pair generation
use log::debug;
use rayon::prelude::*;

use crate::bucket::hasher::{AffiliationBucketHasher, OrganizationBucketHasher};
use crate::bucket::partition::partitioned_equi_join;
use crate::models::core::{Affiliation, DocumentOrganization, Organization};
use crate::models::matching::CandidatePair;

/// Strategy for pairing affiliations with organizations worth scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateJoiner {
    /// Pairs records that share a bucket key. Ignores document-organization relations.
    HashBucket {
        affiliation_hasher: AffiliationBucketHasher,
        organization_hasher: OrganizationBucketHasher,
    },
    /// Pairs an affiliation with every organization related to its document.
    /// Ignores names entirely.
    DocOrgRelation,
}

impl CandidateJoiner {
    pub fn hash_bucket(
        affiliation_hasher: AffiliationBucketHasher,
        organization_hasher: OrganizationBucketHasher,
    ) -> Self {
        CandidateJoiner::HashBucket {
            affiliation_hasher,
            organization_hasher,
        }
    }

    /// Joins the collections into candidate pairs. Never deduplicates.
    pub fn join<'a>(
        &self,
        affiliations: &'a [Affiliation],
        organizations: &'a [Organization],
        document_organizations: &'a [DocumentOrganization],
        partitions: usize,
    ) -> Vec<CandidatePair<'a>> {
        match self {
            CandidateJoiner::HashBucket {
                affiliation_hasher,
                organization_hasher,
            } => join_by_bucket(
                affiliations,
                organizations,
                affiliation_hasher,
                organization_hasher,
                partitions,
            ),
            CandidateJoiner::DocOrgRelation => {
                join_by_document_relation(affiliations, organizations, document_organizations, partitions)
            }
        }
    }
}

fn join_by_bucket<'a>(
    affiliations: &'a [Affiliation],
    organizations: &'a [Organization],
    affiliation_hasher: &AffiliationBucketHasher,
    organization_hasher: &OrganizationBucketHasher,
    partitions: usize,
) -> Vec<CandidatePair<'a>> {
    let hashed_affiliations: Vec<(String, &'a Affiliation)> = affiliations
        .par_iter()
        .flat_map_iter(|aff| affiliation_hasher.hash(aff).into_iter().map(move |key| (key, aff)))
        .collect();
    let hashed_organizations: Vec<(String, &'a Organization)> = organizations
        .par_iter()
        .flat_map_iter(|org| organization_hasher.hash(org).into_iter().map(move |key| (key, org)))
        .collect();

    debug!(
        "Bucket join: {} hashed affiliations, {} hashed organization names",
        hashed_affiliations.len(),
        hashed_organizations.len()
    );

    partitioned_equi_join(hashed_affiliations, hashed_organizations, partitions)
        .into_iter()
        .map(|(aff, org)| CandidatePair::new(aff, org))
        .collect()
}

fn join_by_document_relation<'a>(
    affiliations: &'a [Affiliation],
    organizations: &'a [Organization],
    document_organizations: &'a [DocumentOrganization],
    partitions: usize,
) -> Vec<CandidatePair<'a>> {
    let affiliations_by_doc = affiliations
        .iter()
        .map(|aff| (aff.document_id.clone(), aff));
    let relations_by_doc = document_organizations
        .iter()
        .map(|rel| (rel.document_id().to_string(), rel));

    let affiliations_by_org: Vec<(String, &'a Affiliation)> =
        partitioned_equi_join(affiliations_by_doc, relations_by_doc, partitions)
            .into_iter()
            .map(|(aff, rel)| (rel.organization_id().to_string(), aff))
            .collect();
    let organizations_by_id = organizations.iter().map(|org| (org.id.clone(), org));

    partitioned_equi_join(affiliations_by_org, organizations_by_id, partitions)
        .into_iter()
        .map(|(aff, org)| CandidatePair::new(aff, org))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::hasher::HashStrategy;
    use crate::models::core::OrgNameSource;

    fn organizations() -> Vec<Organization> {
        vec![
            Organization::new("ORG_UT").with_name("University of Toronto"),
            Organization::new("ORG_TARTU").with_name("University of Tartu"),
            Organization::new("ORG_MIT")
                .with_name("Massachusetts Institute of Technology")
                .with_short_name("MIT"),
            Organization::new("ORG_EMPTY"),
        ]
    }

    fn affiliations() -> Vec<Affiliation> {
        vec![
            Affiliation::new("DOC1", 0).with_organization_name("Dept. of Chemistry, University of Toronto"),
            Affiliation::new("DOC1", 1).with_organization_name("Massachusetts Institute of Technology, Cambridge MA"),
            Affiliation::new("DOC2", 0).with_organization_name(""),
        ]
    }

    #[test]
    fn test_hash_bucket_join_pairs_share_key() {
        let affs = affiliations();
        let orgs = organizations();
        let aff_hasher = AffiliationBucketHasher::default();
        let org_hasher = OrganizationBucketHasher::default();
        let joiner = CandidateJoiner::hash_bucket(aff_hasher.clone(), org_hasher.clone());

        let pairs = joiner.join(&affs, &orgs, &[], 4);

        assert!(!pairs.is_empty());
        for pair in &pairs {
            let aff_keys = aff_hasher.hash(pair.affiliation);
            let org_keys = org_hasher.hash(pair.organization);
            assert!(aff_keys.iter().any(|k| org_keys.contains(k)));
        }
        // "ut" bucket holds both Toronto and Tartu; the joiner does not judge names.
        let ids: Vec<&str> = pairs.iter().map(|p| p.organization.id.as_str()).collect();
        assert!(ids.contains(&"ORG_UT"));
        assert!(ids.contains(&"ORG_TARTU"));
        assert!(ids.contains(&"ORG_MIT"));
        assert!(pairs.iter().all(|p| p.affiliation.document_id != "DOC2"));
        assert!(pairs.iter().all(|p| p.organization.id != "ORG_EMPTY"));
    }

    #[test]
    fn test_hash_bucket_join_with_short_names() {
        let affs = affiliations();
        let orgs = organizations();
        let joiner = CandidateJoiner::hash_bucket(
            AffiliationBucketHasher::default(),
            OrganizationBucketHasher::new(HashStrategy::Acronym, OrgNameSource::ShortName),
        );

        let pairs = joiner.join(&affs, &orgs, &[], 2);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].affiliation.position, 1);
        assert_eq!(pairs[0].organization.id, "ORG_MIT");
    }

    #[test]
    fn test_doc_org_relation_join() {
        let affs = affiliations();
        let orgs = organizations();
        let relations = vec![
            DocumentOrganization::new("DOC1", "ORG_TARTU").unwrap(),
            DocumentOrganization::new("DOC3", "ORG_UT").unwrap(),
            DocumentOrganization::new("DOC2", "ORG_UNKNOWN").unwrap(),
        ];

        let pairs = CandidateJoiner::DocOrgRelation.join(&affs, &orgs, &relations, 3);

        assert_eq!(pairs.len(), 2);
        assert!(pairs
            .iter()
            .all(|p| p.affiliation.document_id == "DOC1" && p.organization.id == "ORG_TARTU"));
    }

    #[test]
    fn test_join_order_ignores_partition_count() {
        let affs = affiliations();
        let orgs = organizations();
        let joiner = CandidateJoiner::hash_bucket(
            AffiliationBucketHasher::default(),
            OrganizationBucketHasher::default(),
        );
        let first: Vec<(String, String)> = joiner
            .join(&affs, &orgs, &[], 5)
            .iter()
            .map(|p| (p.affiliation.key().to_string(), p.organization.id.clone()))
            .collect();
        let second: Vec<(String, String)> = joiner
            .join(&affs, &orgs, &[], 1)
            .iter()
            .map(|p| (p.affiliation.key().to_string(), p.organization.id.clone()))
            .collect();
        assert_eq!(first, second);
    }
}
