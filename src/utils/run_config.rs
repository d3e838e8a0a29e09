//! Run configuration for the matching binary.
//! Values come from `AFFMATCH_*` environment variables; CLI flags override them.

use log::{debug, info};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{MatchingError, Result};
use crate::matching::presets::DEFAULT_MATCHER_ORDER;
use crate::models::stats_models::MatcherKind;
use crate::utils::constants::DEFAULT_OUTPUT_FILES;

#[derive(Debug, Clone)]
pub struct MatchingRunConfig {
    pub affiliations_path: Option<PathBuf>,
    pub organizations_path: Option<PathBuf>,
    pub document_projects_path: Option<PathBuf>,
    pub inferred_document_projects_path: Option<PathBuf>,
    pub project_organizations_path: Option<PathBuf>,
    pub alt_names_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub number_of_output_files: usize,
    pub join_partitions: usize,
    pub min_document_project_confidence: Option<f32>,
    pub matchers: Vec<MatcherKind>,
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Parses `key` when it is set. Unset or blank variables yield `None`; any
/// other value that does not parse is a configuration error.
fn env_parsed<T: FromStr>(key: &str) -> Result<Option<T>> {
    let raw = match env::var(key) {
        Ok(raw) => raw,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            return Err(MatchingError::InvalidEngineConfig(format!("{} is not valid unicode", key)))
        }
    };
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| MatchingError::InvalidEngineConfig(format!("{} has an unparseable value '{}'", key, raw)))
}

/// Comma separated matcher names; blank entries are skipped.
pub fn parse_matcher_list(value: &str) -> Vec<MatcherKind> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

impl MatchingRunConfig {
    /// Create configuration from environment variables. Absent variables take
    /// their defaults; malformed ones are rejected.
    pub fn from_env() -> Result<Self> {
        let matchers = env::var("AFFMATCH_MATCHERS")
            .map(|value| parse_matcher_list(&value))
            .unwrap_or_else(|_| DEFAULT_MATCHER_ORDER.to_vec());

        let config = Self {
            affiliations_path: env_path("AFFMATCH_AFFILIATIONS_PATH"),
            organizations_path: env_path("AFFMATCH_ORGANIZATIONS_PATH"),
            document_projects_path: env_path("AFFMATCH_DOCUMENT_PROJECTS_PATH"),
            inferred_document_projects_path: env_path("AFFMATCH_INFERRED_DOCUMENT_PROJECTS_PATH"),
            project_organizations_path: env_path("AFFMATCH_PROJECT_ORGANIZATIONS_PATH"),
            alt_names_path: env_path("AFFMATCH_ALT_NAMES_PATH"),
            output_dir: env_path("AFFMATCH_OUTPUT_DIR").unwrap_or_else(|| PathBuf::from("output")),
            number_of_output_files: env_parsed("AFFMATCH_OUTPUT_FILES")?.unwrap_or(DEFAULT_OUTPUT_FILES),
            join_partitions: env_parsed("AFFMATCH_JOIN_PARTITIONS")?.unwrap_or_else(num_cpus::get),
            min_document_project_confidence: env_parsed("AFFMATCH_MIN_DOC_PROJECT_CONFIDENCE")?,
            matchers,
        };

        debug!("Run config from env: {:?}", config);
        Ok(config)
    }

    /// Checks the values the engine cannot recover from.
    pub fn validate(&self) -> Result<()> {
        if self.number_of_output_files == 0 {
            return Err(MatchingError::InvalidEngineConfig(
                "number of output files must be at least 1".to_string(),
            ));
        }
        if self.join_partitions == 0 {
            return Err(MatchingError::InvalidEngineConfig(
                "number of join partitions must be at least 1".to_string(),
            ));
        }
        if self.matchers.is_empty() {
            return Err(MatchingError::InvalidEngineConfig(
                "at least one matcher is required".to_string(),
            ));
        }
        if let Some(threshold) = self.min_document_project_confidence {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(MatchingError::InvalidEngineConfig(format!(
                    "document-project confidence threshold must be in [0, 1], got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }

    /// Whether document-organization relations can be derived at all.
    pub fn has_relation_inputs(&self) -> bool {
        self.project_organizations_path.is_some()
            && (self.document_projects_path.is_some() || self.inferred_document_projects_path.is_some())
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        info!("⚙️  Affiliation matching configuration:");
        info!("   • Output: {} ({} part files)", self.output_dir.display(), self.number_of_output_files);
        info!("   • Join partitions: {}", self.join_partitions);
        info!(
            "   • Matchers: {}",
            self.matchers.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ")
        );
        match self.min_document_project_confidence {
            Some(threshold) => info!("   • Document-project confidence threshold: {}", threshold),
            None => info!("   • Document-project confidence threshold: none"),
        }
        if self.has_relation_inputs() {
            info!("🔗 Document-organization relations ENABLED");
        } else {
            info!("🔗 Document-organization relations DISABLED - no project inputs configured");
        }
        if let Some(path) = &self.alt_names_path {
            info!("🏷️  Alternative names from {}", path.display());
        }
    }
}
