// src/io/writer.rs - Matched organizations split into part files
use anyhow::{Context, Result};
use log::info;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::bucket::partition::partition_index;
use crate::error::MatchingError;
use crate::models::matching::{FinalMatch, MatchedOrganization};
use crate::utils::constants::{OUTPUT_PART_EXTENSION, OUTPUT_PART_PREFIX};

pub fn part_file_name(idx: usize) -> String {
    format!("{}{:05}.{}", OUTPUT_PART_PREFIX, idx, OUTPUT_PART_EXTENSION)
}

/// One record per (document, organization). Occurrences of the same
/// organization at several positions keep the highest strength.
fn collapse_positions(matches: &[FinalMatch]) -> Vec<MatchedOrganization> {
    let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
    let mut records: Vec<MatchedOrganization> = Vec::with_capacity(matches.len());
    for m in matches {
        match seen.entry((m.document_id.as_str(), m.organization_id.as_str())) {
            Entry::Occupied(entry) => {
                let record = &mut records[*entry.get()];
                record.match_strength = record.match_strength.max(m.match_strength);
            }
            Entry::Vacant(entry) => {
                entry.insert(records.len());
                records.push(MatchedOrganization::from(m));
            }
        }
    }
    records
}

/// Writes `matches` as JSON lines into `number_of_files` part files under
/// `output_dir`. A document always lands in the same part; every part file is
/// created even when empty. Records carry no position, so a document lists
/// each organization once. Returns the paths in part order.
pub fn write_matches(output_dir: &Path, matches: &[FinalMatch], number_of_files: usize) -> Result<Vec<PathBuf>> {
    if number_of_files == 0 {
        return Err(MatchingError::InvalidEngineConfig(
            "number of output files must be at least 1".to_string(),
        )
        .into());
    }
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let paths: Vec<PathBuf> = (0..number_of_files)
        .map(|idx| output_dir.join(part_file_name(idx)))
        .collect();
    let mut writers = paths
        .iter()
        .map(|path| {
            File::create(path)
                .map(BufWriter::new)
                .with_context(|| format!("Failed to create {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let records = collapse_positions(matches);
    for record in &records {
        let idx = partition_index(&record.document_id, number_of_files);
        let writer = &mut writers[idx];
        serde_json::to_writer(&mut *writer, record)
            .with_context(|| format!("Failed to serialize match for document {}", record.document_id))?;
        writer
            .write_all(b"\n")
            .with_context(|| format!("Failed to write {}", paths[idx].display()))?;
    }
    for (writer, path) in writers.iter_mut().zip(&paths) {
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", path.display()))?;
    }

    info!(
        "Wrote {} matched organizations into {} files under {}",
        records.len(),
        number_of_files,
        output_dir.display()
    );
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::reader::read_json_lines;
    use tempfile::tempdir;

    fn final_match(doc: &str, position: u32, org: &str) -> FinalMatch {
        FinalMatch {
            document_id: doc.to_string(),
            position,
            organization_id: org.to_string(),
            match_strength: 0.9,
        }
    }

    #[test]
    fn test_part_file_name() {
        assert_eq!(part_file_name(0), "part-00000.jsonl");
        assert_eq!(part_file_name(12), "part-00012.jsonl");
    }

    #[test]
    fn test_documents_stay_in_one_part() {
        let dir = tempdir().unwrap();
        let matches = vec![
            final_match("DOC1", 0, "ORG1"),
            final_match("DOC1", 1, "ORG2"),
            final_match("DOC2", 0, "ORG1"),
            final_match("DOC3", 0, "ORG3"),
        ];

        let paths = write_matches(dir.path(), &matches, 3).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| p.exists()));

        let mut total = 0;
        for path in &paths {
            let records: Vec<MatchedOrganization> = read_json_lines(path).unwrap();
            total += records.len();
            for record in &records {
                assert_eq!(path, &paths[partition_index(&record.document_id, 3)]);
            }
        }
        assert_eq!(total, 4);

        let doc1_part: Vec<MatchedOrganization> =
            read_json_lines(&paths[partition_index("DOC1", 3)]).unwrap();
        let doc1: Vec<&str> = doc1_part
            .iter()
            .filter(|r| r.document_id == "DOC1")
            .map(|r| r.organization_id.as_str())
            .collect();
        assert_eq!(doc1, vec!["ORG1", "ORG2"]);
    }

    #[test]
    fn test_repeated_organization_in_document_written_once() {
        let dir = tempdir().unwrap();
        let mut second = final_match("DOC1", 2, "ORG1");
        second.match_strength = 0.95;
        let matches = vec![final_match("DOC1", 0, "ORG1"), final_match("DOC1", 1, "ORG2"), second];

        let paths = write_matches(dir.path(), &matches, 1).unwrap();
        let records: Vec<MatchedOrganization> = read_json_lines(&paths[0]).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].organization_id, "ORG1");
        assert!((records[0].match_strength - 0.95).abs() < 1e-6);
        assert_eq!(records[1].organization_id, "ORG2");
    }

    #[test]
    fn test_zero_output_files_is_error() {
        let dir = tempdir().unwrap();
        assert!(write_matches(dir.path(), &[], 0).is_err());
    }
}
