// src/models/core.rs - Records the engine reads
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{MatchingError, Result};

/// One occurrence of an organization name inside a document's affiliation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affiliation {
    pub document_id: String,
    pub position: u32,
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl Affiliation {
    pub fn new(document_id: impl Into<String>, position: u32) -> Self {
        Self {
            document_id: document_id.into(),
            position,
            organization_name: String::new(),
            country_code: None,
        }
    }

    pub fn with_organization_name(mut self, organization_name: impl Into<String>) -> Self {
        self.organization_name = organization_name.into();
        self
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    pub fn key(&self) -> AffiliationKey {
        AffiliationKey {
            document_id: self.document_id.clone(),
            position: self.position,
        }
    }
}

/// Identity of an affiliation occurrence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliationKey {
    pub document_id: String,
    pub position: u32,
}

impl fmt::Display for AffiliationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.document_id, self.position)
    }
}

/// An organization from the reference catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    /// Filled once by the alt-name dictionary before matching starts.
    #[serde(default)]
    pub alternative_names: BTreeSet<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl Organization {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            short_name: None,
            alternative_names: BTreeSet::new(),
            country_code: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    pub fn with_alternative_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternative_names = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Which of an organization's names a hasher or voter looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrgNameSource {
    #[default]
    Name,
    ShortName,
    AlternativeNames,
}

impl Organization {
    /// Non-blank names from the given source, in a stable order.
    pub fn names(&self, source: OrgNameSource) -> Vec<&str> {
        let names: Vec<&str> = match source {
            OrgNameSource::Name => vec![self.name.as_str()],
            OrgNameSource::ShortName => self.short_name.iter().map(String::as_str).collect(),
            OrgNameSource::AlternativeNames => {
                self.alternative_names.iter().map(String::as_str).collect()
            }
        };
        names.into_iter().filter(|n| !n.trim().is_empty()).collect()
    }
}

/// Paired document and organization identifiers, derived from
/// document→project→organization relations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOrganization {
    document_id: String,
    organization_id: String,
}

impl DocumentOrganization {
    pub fn new(document_id: impl Into<String>, organization_id: impl Into<String>) -> Result<Self> {
        let document_id = document_id.into();
        let organization_id = organization_id.into();
        if document_id.trim().is_empty() {
            return Err(MatchingError::InvalidRelation(format!(
                "blank document id for organization '{}'",
                organization_id
            )));
        }
        if organization_id.trim().is_empty() {
            return Err(MatchingError::InvalidRelation(format!(
                "blank organization id for document '{}'",
                document_id
            )));
        }
        Ok(Self {
            document_id,
            organization_id,
        })
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }
}

/// Document to project relation; imported relations usually carry no confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentProject {
    pub document_id: String,
    pub project_id: String,
    #[serde(default)]
    pub confidence_level: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOrganization {
    pub project_id: String,
    pub organization_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_organization_rejects_blank_ids() {
        assert!(DocumentOrganization::new("  ", "ORG1").is_err());
        assert!(DocumentOrganization::new("DOC1", "").is_err());

        let relation = DocumentOrganization::new("DOC1", "ORG1").unwrap();
        assert_eq!(relation.document_id(), "DOC1");
        assert_eq!(relation.organization_id(), "ORG1");
    }

    #[test]
    fn test_affiliation_deserializes_without_optional_fields() {
        let aff: Affiliation =
            serde_json::from_str(r#"{"documentId":"DOC1","position":2}"#).unwrap();
        assert_eq!(aff.key().to_string(), "DOC1#2");
        assert!(aff.organization_name.is_empty());
        assert!(aff.country_code.is_none());
    }

    #[test]
    fn test_organization_names_skip_blank_values() {
        let org = Organization::new("ORG1")
            .with_name("Uniwersytet Warszawski")
            .with_short_name("  ")
            .with_alternative_names(["University of Warsaw", ""]);

        assert_eq!(org.names(OrgNameSource::Name), vec!["Uniwersytet Warszawski"]);
        assert!(org.names(OrgNameSource::ShortName).is_empty());
        assert_eq!(org.names(OrgNameSource::AlternativeNames), vec!["University of Warsaw"]);
    }

    #[test]
    fn test_organization_deserializes_camel_case() {
        let org: Organization = serde_json::from_str(
            r#"{"id":"ORG1","name":"University of Warsaw","shortName":"UW","countryCode":"PL"}"#,
        )
        .unwrap();
        assert_eq!(org.short_name.as_deref(), Some("UW"));
        assert!(org.alternative_names.is_empty());
    }
}
