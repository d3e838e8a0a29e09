// src/relations.rs - Document→organization relations derived through projects
use log::{debug, info};
use std::collections::BTreeSet;

use crate::bucket::partition::partitioned_equi_join;
use crate::error::{MatchingError, Result};
use crate::models::core::{DocumentOrganization, DocumentProject, ProjectOrganization};

/// Derives distinct document→organization relations.
///
/// Imported and inferred document→project relations are merged, those with a
/// confidence below `min_confidence` are dropped (a missing confidence counts
/// as certain), and the rest are joined with project→organization relations
/// on the project id. Output is sorted by document id, then organization id.
pub fn build_document_organizations(
    imported: &[DocumentProject],
    inferred: &[DocumentProject],
    project_organizations: &[ProjectOrganization],
    min_confidence: Option<f32>,
    partitions: usize,
) -> Result<Vec<DocumentOrganization>> {
    if let Some(threshold) = min_confidence {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MatchingError::InvalidEngineConfig(format!(
                "document-project confidence threshold must be in [0, 1], got {}",
                threshold
            )));
        }
    }

    let accepted: Vec<&DocumentProject> = imported
        .iter()
        .chain(inferred.iter())
        .filter(|rel| match (min_confidence, rel.confidence_level) {
            (Some(threshold), Some(confidence)) => confidence >= threshold,
            _ => true,
        })
        .collect();
    debug!(
        "Document-project relations: {} of {} above confidence threshold {:?}",
        accepted.len(),
        imported.len() + inferred.len(),
        min_confidence
    );

    let joined = partitioned_equi_join(
        accepted.into_iter().map(|rel| (rel.project_id.clone(), rel)),
        project_organizations.iter().map(|rel| (rel.project_id.clone(), rel)),
        partitions,
    );

    let relations = joined
        .into_iter()
        .map(|(doc_proj, proj_org)| DocumentOrganization::new(&doc_proj.document_id, &proj_org.organization_id))
        .collect::<Result<BTreeSet<_>>>()?;

    info!("Derived {} document-organization relations", relations.len());
    Ok(relations.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_proj(doc: &str, proj: &str, confidence: Option<f32>) -> DocumentProject {
        DocumentProject {
            document_id: doc.to_string(),
            project_id: proj.to_string(),
            confidence_level: confidence,
        }
    }

    fn proj_org(proj: &str, org: &str) -> ProjectOrganization {
        ProjectOrganization {
            project_id: proj.to_string(),
            organization_id: org.to_string(),
        }
    }

    #[test]
    fn test_confidence_threshold_applies_to_inferred_relations() {
        let imported = vec![doc_proj("DOC1", "PROJ1", None)];
        let inferred = vec![
            doc_proj("DOC2", "PROJ1", Some(0.9)),
            doc_proj("DOC3", "PROJ2", Some(0.5)),
            doc_proj("DOC2", "PROJ2", Some(0.8)),
        ];
        let project_orgs = vec![proj_org("PROJ1", "ORG1"), proj_org("PROJ2", "ORG2"), proj_org("PROJ1", "ORG3")];

        let relations = build_document_organizations(&imported, &inferred, &project_orgs, Some(0.8), 4).unwrap();
        let pairs: Vec<(&str, &str)> = relations
            .iter()
            .map(|r| (r.document_id(), r.organization_id()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("DOC1", "ORG1"),
                ("DOC1", "ORG3"),
                ("DOC2", "ORG1"),
                ("DOC2", "ORG2"),
                ("DOC2", "ORG3"),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_removed() {
        let imported = vec![doc_proj("DOC1", "PROJ1", None)];
        let inferred = vec![doc_proj("DOC1", "PROJ1", Some(1.0))];
        let project_orgs = vec![proj_org("PROJ1", "ORG1")];

        let relations = build_document_organizations(&imported, &inferred, &project_orgs, None, 2).unwrap();
        assert_eq!(relations.len(), 1);
    }

    #[test]
    fn test_blank_ids_and_bad_threshold_are_errors() {
        let imported = vec![doc_proj("", "PROJ1", None)];
        let project_orgs = vec![proj_org("PROJ1", "ORG1")];
        assert!(matches!(
            build_document_organizations(&imported, &[], &project_orgs, None, 2),
            Err(MatchingError::InvalidRelation(_))
        ));
        assert!(matches!(
            build_document_organizations(&[], &[], &project_orgs, Some(1.5), 2),
            Err(MatchingError::InvalidEngineConfig(_))
        ));
    }
}
