// src/utils/progress_bars/logging.rs - Logging helpers for matchers and the matching run
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::models::stats_models::{MatcherKind, MatcherStats};

fn matcher_label(kind: &MatcherKind) -> (String, &'static str) {
    match kind {
        MatcherKind::DocOrgRelation => ("DOC_ORG_RELATION".to_string(), "🔗"),
        MatcherKind::NameMainSection => ("NAME_MAIN_SECTION".to_string(), "🏛️"),
        MatcherKind::AlternativeNameMainSection => ("ALT_NAME_MAIN_SECTION".to_string(), "📚"),
        MatcherKind::ShortNameMainSection => ("SHORT_NAME_MAIN_SECTION".to_string(), "🔤"),
        MatcherKind::FirstWords => ("FIRST_WORDS".to_string(), "📝"),
        MatcherKind::Custom(name) => (name.to_uppercase(), "⚙️"),
    }
}

#[derive(Clone)]
pub struct MatchingLogger {
    matcher_name: String,
    matcher_emoji: &'static str,
    start_time: Instant,
}

impl MatchingLogger {
    pub fn new(kind: &MatcherKind) -> Self {
        let (matcher_name, matcher_emoji) = matcher_label(kind);
        Self {
            matcher_name,
            matcher_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, run_id: &str, voter_count: usize) {
        info!(
            "[{}] {} 🚀 Starting matcher (run ID: {}) with {} voters",
            self.matcher_name, self.matcher_emoji, run_id, voter_count
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        let msg = if let Some(details) = details {
            format!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.matcher_name, self.matcher_emoji, phase, details, elapsed.as_secs_f32()
            )
        } else {
            format!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.matcher_name, self.matcher_emoji, phase, elapsed.as_secs_f32()
            )
        };
        info!("{}", msg);
    }

    pub fn log_candidates(&self, candidate_pairs: usize, affiliations: usize) {
        info!(
            "[{}] {} 📈 Candidate pairs to score: {} (for {} affiliations)",
            self.matcher_name, self.matcher_emoji, candidate_pairs, affiliations
        );
    }

    pub fn log_scoring_results(&self, candidate_pairs: usize, match_results: usize) {
        let percent_kept = if candidate_pairs > 0 {
            (match_results as f64 / candidate_pairs as f64) * 100.0
        } else {
            0.0
        };
        info!(
            "[{}] {} 🎯 Scoring: {} pairs → {} with positive strength ({:.1}% kept)",
            self.matcher_name, self.matcher_emoji, candidate_pairs, match_results, percent_kept
        );
    }

    pub fn log_completion(&self, stats: &MatcherStats) {
        let duration = self.start_time.elapsed();
        info!(
            "[{}] {} 🎉 COMPLETED: {} match results in {:.2?}",
            self.matcher_name, self.matcher_emoji, stats.match_results, duration
        );
        info!(
            "[{}] {} 📊 Results: {} affiliations matched, avg strength: {:.3}, {} candidate pairs",
            self.matcher_name,
            self.matcher_emoji,
            stats.affiliations_matched,
            stats.avg_match_strength,
            stats.candidate_pairs
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!("[{}] {} ⚠️  {}", self.matcher_name, self.matcher_emoji, message);
    }

    pub fn log_debug(&self, message: &str) {
        debug!("[{}] {} {}", self.matcher_name, self.matcher_emoji, message);
    }

    pub fn get_matcher_name(&self) -> &str {
        &self.matcher_name
    }
}

// Run-level logging functions
pub fn log_pipeline_start(run_id: &str, matchers: &[MatcherKind], partitions: usize, alt_name_groups: usize) {
    info!("🚀 ===== AFFILIATION MATCHING STARTING =====");
    info!("📅 Run ID: {}", run_id);
    info!("⚙️  Configuration:");
    info!("   • {} matchers enabled", matchers.len());
    info!("   • Join partitions: {}", partitions);
    info!("   • Alternative name groups: {}", alt_name_groups);
    let labels: Vec<String> = matchers
        .iter()
        .map(|kind| {
            let (name, emoji) = matcher_label(kind);
            format!("{} {}", name, emoji)
        })
        .collect();
    info!("🎯 Matchers: {}", labels.join(", "));
    info!("================================================");
}

pub fn log_pipeline_phase(phase: &str, details: Option<&str>) {
    let msg = if let Some(details) = details {
        format!("🔄 Pipeline Phase: {} - {}", phase, details)
    } else {
        format!("🔄 Pipeline Phase: {}", phase)
    };
    info!("{}", msg);
}

pub fn log_pipeline_method_completed(stats: &MatcherStats) {
    let (name, emoji) = matcher_label(&stats.matcher);
    info!(
        "✅ [{}] {} completed in {:.2}s: {} results, {} affiliations (avg strength: {:.3})",
        name, emoji, stats.duration_secs, stats.match_results, stats.affiliations_matched, stats.avg_match_strength
    );
}

pub fn log_pipeline_completion(run_id: &str, duration: Duration, total_matches: usize, matcher_stats: &[MatcherStats]) {
    info!("🎉 ===== AFFILIATION MATCHING COMPLETED =====");
    info!("📅 Run ID: {}", run_id);
    info!("⏱️  Total Duration: {:.2?}", duration);
    info!("🎯 Final Matches: {}", total_matches);
    info!("");
    info!("📈 Matcher Breakdown:");

    let mut total_results = 0;
    for stats in matcher_stats {
        let (name, emoji) = matcher_label(&stats.matcher);
        total_results += stats.match_results;
        info!(
            "  {} {}: {} pairs, {} results, {} affiliations (avg strength: {:.3})",
            emoji, name, stats.candidate_pairs, stats.match_results, stats.affiliations_matched, stats.avg_match_strength
        );
    }

    info!("");
    info!("📊 Summary:");
    info!("  • Match results before selection: {}", total_results);
    if !matcher_stats.is_empty() {
        info!(
            "  • Average results per matcher: {:.1}",
            total_results as f64 / matcher_stats.len() as f64
        );
    }
    info!("===============================================");
}
