// src/dictionary.rs - Alternative organization names
use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use crate::models::core::Organization;
use crate::normalize::text::collapse_whitespace;

/// Groups of names that denote the same organization, e.g. a name and its
/// translations. Lookup ignores case and surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct AltNameDictionary {
    groups: Vec<BTreeSet<String>>,
    index: HashMap<String, Vec<usize>>,
}

fn lookup_key(name: &str) -> String {
    collapse_whitespace(name).to_lowercase()
}

impl AltNameDictionary {
    /// Builds the dictionary from groups of names. Blank names are ignored and
    /// groups left with fewer than two names are dropped.
    pub fn from_groups<G, S>(groups: G) -> Self
    where
        G: IntoIterator,
        G::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::default();
        for group in groups {
            let names: BTreeSet<String> = group
                .into_iter()
                .map(|name| collapse_whitespace(name.as_ref()))
                .filter(|name| !name.is_empty())
                .collect();
            if names.len() < 2 {
                continue;
            }
            let group_idx = dictionary.groups.len();
            for name in &names {
                let entry = dictionary.index.entry(lookup_key(name)).or_default();
                if !entry.contains(&group_idx) {
                    entry.push(group_idx);
                }
            }
            dictionary.groups.push(names);
        }
        dictionary
    }

    /// Reads a headerless CSV where every row is one group. Rows may have any
    /// number of cells.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut groups = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read alternative names row {}", idx + 1))?;
            groups.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }
        Ok(Self::from_groups(groups))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open alternative names file {}", path.display()))?;
        let dictionary = Self::from_csv_reader(file)?;
        info!(
            "Loaded {} alternative name groups from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every name sharing a group with `name`, except `name` itself.
    pub fn alternative_names(&self, name: &str) -> BTreeSet<String> {
        let key = lookup_key(name);
        let Some(group_ids) = self.index.get(&key) else {
            return BTreeSet::new();
        };
        group_ids
            .iter()
            .flat_map(|idx| self.groups[*idx].iter())
            .filter(|candidate| lookup_key(candidate) != key)
            .cloned()
            .collect()
    }

    /// Adds the alternative names found for each organization's name or short
    /// name. The organization's own names are never added. Returns the number
    /// of organizations that gained at least one name.
    pub fn fill_organizations(&self, organizations: &mut [Organization]) -> usize {
        if self.is_empty() {
            return 0;
        }
        let mut filled = 0;
        for org in organizations.iter_mut() {
            let mut names = self.alternative_names(&org.name);
            if let Some(short_name) = org.short_name.as_deref() {
                names.extend(self.alternative_names(short_name));
            }
            let own_keys = [Some(lookup_key(&org.name)), org.short_name.as_deref().map(lookup_key)];
            names.retain(|name| !own_keys.contains(&Some(lookup_key(name))));
            let before = org.alternative_names.len();
            org.alternative_names.extend(names);
            if org.alternative_names.len() > before {
                filled += 1;
            }
        }
        debug!("Alternative names added to {} organizations", filled);
        filled
    }
}
