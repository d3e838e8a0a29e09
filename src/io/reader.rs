// src/io/reader.rs - JSON-lines input readers
use anyhow::{Context, Result};
use log::info;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::models::core::{Affiliation, DocumentProject, Organization, ProjectOrganization};

/// One affiliation entry of an extracted document. Fields other than the
/// organization name and country are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliationEntry {
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Extracted metadata of one document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub id: String,
    #[serde(default)]
    pub affiliations: Vec<AffiliationEntry>,
}

impl DocumentMetadata {
    /// One `Affiliation` per entry; position is the entry's index.
    pub fn into_affiliations(self) -> Vec<Affiliation> {
        let document_id = self.id;
        self.affiliations
            .into_iter()
            .enumerate()
            .map(|(position, entry)| Affiliation {
                document_id: document_id.clone(),
                position: position as u32,
                organization_name: entry.organization.unwrap_or_default(),
                country_code: entry.country_code,
            })
            .collect()
    }
}

/// Reads one JSON record per line. Blank lines are skipped.
pub fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {} of {}", idx + 1, path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse line {} of {}", idx + 1, path.display()))?;
        records.push(record);
    }
    Ok(records)
}

pub fn read_affiliations(path: &Path) -> Result<Vec<Affiliation>> {
    let documents: Vec<DocumentMetadata> = read_json_lines(path)?;
    let document_count = documents.len();
    let affiliations: Vec<Affiliation> = documents
        .into_iter()
        .flat_map(DocumentMetadata::into_affiliations)
        .collect();
    info!(
        "Read {} affiliations from {} documents in {}",
        affiliations.len(),
        document_count,
        path.display()
    );
    Ok(affiliations)
}

pub fn read_organizations(path: &Path) -> Result<Vec<Organization>> {
    let organizations: Vec<Organization> = read_json_lines(path)?;
    info!("Read {} organizations from {}", organizations.len(), path.display());
    Ok(organizations)
}

pub fn read_document_projects(path: &Path) -> Result<Vec<DocumentProject>> {
    let relations: Vec<DocumentProject> = read_json_lines(path)?;
    info!("Read {} document-project relations from {}", relations.len(), path.display());
    Ok(relations)
}

pub fn read_project_organizations(path: &Path) -> Result<Vec<ProjectOrganization>> {
    let relations: Vec<ProjectOrganization> = read_json_lines(path)?;
    info!("Read {} project-organization relations from {}", relations.len(), path.display());
    Ok(relations)
}
