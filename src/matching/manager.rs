// src/matching/manager.rs - Runs the matcher list and selects final matches
use indicatif::MultiProgress;
use log::{debug, info};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use crate::dictionary::AltNameDictionary;
use crate::error::{MatchingError, Result};
use crate::matching::chooser::pick_best_matches;
use crate::matching::matcher::{AffOrgMatcher, MATCHER_STEPS};
use crate::models::core::{Affiliation, DocumentOrganization, Organization};
use crate::models::matching::{FinalMatch, MatchResult};
use crate::models::stats_models::{MatcherKind, MatcherStats};
use crate::utils::progress_bars::logging::{
    log_pipeline_completion, log_pipeline_method_completed, log_pipeline_phase, log_pipeline_start,
};
use crate::utils::progress_bars::progress_config::add_bar;

/// Final matches of a run together with what each matcher contributed.
#[derive(Debug, Clone)]
pub struct MatchingOutcome {
    pub matches: Vec<FinalMatch>,
    pub matcher_stats: Vec<MatcherStats>,
}

pub struct MatchingEngine {
    matchers: Vec<AffOrgMatcher>,
    partitions: usize,
    alt_names: Arc<AltNameDictionary>,
    run_id: String,
    multi_progress: Option<MultiProgress>,
    detailed_progress: bool,
}

impl MatchingEngine {
    pub fn new(matchers: Vec<AffOrgMatcher>, partitions: usize, alt_names: Arc<AltNameDictionary>) -> Result<Self> {
        if matchers.is_empty() {
            return Err(MatchingError::InvalidEngineConfig(
                "at least one matcher is required".to_string(),
            ));
        }
        if partitions == 0 {
            return Err(MatchingError::InvalidEngineConfig(
                "number of join partitions must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            matchers,
            partitions,
            alt_names,
            run_id: String::new(),
            multi_progress: None,
            detailed_progress: false,
        })
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    pub fn with_progress(mut self, multi_progress: Option<MultiProgress>, detailed: bool) -> Self {
        self.multi_progress = multi_progress;
        self.detailed_progress = detailed;
        self
    }

    pub fn matcher_kinds(&self) -> Vec<MatcherKind> {
        self.matchers.iter().map(|m| m.kind().clone()).collect()
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// Runs every matcher in list order, unions their results in that order
    /// and keeps the best match per affiliation occurrence.
    pub fn match_affiliations(
        &self,
        affiliations: &[Affiliation],
        organizations: &[Organization],
        document_organizations: &[DocumentOrganization],
    ) -> MatchingOutcome {
        let start = Instant::now();
        let matcher_kinds = self.matcher_kinds();
        log_pipeline_start(&self.run_id, &matcher_kinds, self.partitions, self.alt_names.len());

        log_pipeline_phase("Alternative names", Some("filling organizations from dictionary"));
        let organizations: Cow<[Organization]> = if self.alt_names.is_empty() {
            Cow::Borrowed(organizations)
        } else {
            let mut filled = organizations.to_vec();
            let count = self.alt_names.fill_organizations(&mut filled);
            info!("🏷️  Alternative names added to {} of {} organizations", count, filled.len());
            Cow::Owned(filled)
        };

        let run_pb = add_bar(
            self.multi_progress.as_ref(),
            self.matchers.len() as u64,
            "Running matchers...".to_string(),
        );

        log_pipeline_phase(
            "Matching",
            Some(&format!(
                "{} affiliations, {} organizations, {} document-organization relations",
                affiliations.len(),
                organizations.len(),
                document_organizations.len()
            )),
        );
        let mut all_results: Vec<MatchResult<'_>> = Vec::new();
        let mut matcher_stats = Vec::with_capacity(self.matchers.len());
        for matcher in &self.matchers {
            let matcher_pb = if self.detailed_progress {
                add_bar(self.multi_progress.as_ref(), MATCHER_STEPS, format!("{}: joining", matcher.kind()))
            } else {
                None
            };
            let output = matcher.match_affiliations(
                &self.run_id,
                affiliations,
                &organizations,
                document_organizations,
                self.partitions,
                matcher_pb.as_ref(),
            );
            log_pipeline_method_completed(&output.stats);
            all_results.extend(output.results);
            matcher_stats.push(output.stats);
            if let Some(pb) = &run_pb {
                pb.inc(1);
                pb.set_message(format!("{} results so far", all_results.len()));
            }
        }

        log_pipeline_phase("Selection", Some(&format!("{} match results", all_results.len())));
        let matches = pick_best_matches(&all_results);
        debug!("Selected {} final matches", matches.len());
        if let Some(pb) = &run_pb {
            pb.finish_with_message(format!("{} final matches", matches.len()));
        }

        log_pipeline_completion(&self.run_id, start.elapsed(), matches.len(), &matcher_stats);
        MatchingOutcome { matches, matcher_stats }
    }
}
