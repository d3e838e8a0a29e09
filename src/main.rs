use affmatch_lib::dictionary::AltNameDictionary;
use affmatch_lib::io::{
    read_affiliations, read_document_projects, read_organizations, read_project_organizations, write_matches,
};
use affmatch_lib::matching::manager::MatchingEngine;
use affmatch_lib::matching::presets::preset_matcher;
use affmatch_lib::models::core::{DocumentOrganization, DocumentProject};
use affmatch_lib::models::stats_models::RunSummary;
use affmatch_lib::relations::build_document_organizations;
use affmatch_lib::utils::env::{load_env, log_env_source};
use affmatch_lib::utils::get_memory_usage;
use affmatch_lib::utils::progress_bars::progress_config::{print_env_config_example, ProgressConfig};
use affmatch_lib::utils::run_config::{parse_matcher_list, MatchingRunConfig};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines file of extracted document metadata
    #[arg(long)]
    affiliations: Option<PathBuf>,

    /// JSON-lines file of organizations
    #[arg(long)]
    organizations: Option<PathBuf>,

    /// JSON-lines file of imported document-project relations
    #[arg(long)]
    document_projects: Option<PathBuf>,

    /// JSON-lines file of inferred document-project relations
    #[arg(long)]
    inferred_document_projects: Option<PathBuf>,

    /// JSON-lines file of project-organization relations
    #[arg(long)]
    project_organizations: Option<PathBuf>,

    /// CSV file of alternative organization names, one group per row
    #[arg(long)]
    alt_names: Option<PathBuf>,

    /// Directory receiving the part files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Number of part files to write
    #[arg(long)]
    output_files: Option<usize>,

    /// Number of partitions used by the joins
    #[arg(long)]
    partitions: Option<usize>,

    /// Minimum confidence of document-project relations
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Comma separated matcher names, in execution order
    #[arg(long)]
    matchers: Option<String>,

    /// Print the supported progress environment variables and exit
    #[arg(long)]
    print_env_example: bool,
}

impl Args {
    fn apply(self, config: &mut MatchingRunConfig) {
        let Args {
            affiliations,
            organizations,
            document_projects,
            inferred_document_projects,
            project_organizations,
            alt_names,
            output_dir,
            output_files,
            partitions,
            min_confidence,
            matchers,
            print_env_example: _,
        } = self;
        config.affiliations_path = affiliations.or(config.affiliations_path.take());
        config.organizations_path = organizations.or(config.organizations_path.take());
        config.document_projects_path = document_projects.or(config.document_projects_path.take());
        config.inferred_document_projects_path =
            inferred_document_projects.or(config.inferred_document_projects_path.take());
        config.project_organizations_path = project_organizations.or(config.project_organizations_path.take());
        config.alt_names_path = alt_names.or(config.alt_names_path.take());
        if let Some(dir) = output_dir {
            config.output_dir = dir;
        }
        if let Some(n) = output_files {
            config.number_of_output_files = n;
        }
        if let Some(n) = partitions {
            config.join_partitions = n;
        }
        if min_confidence.is_some() {
            config.min_document_project_confidence = min_confidence;
        }
        if let Some(names) = matchers {
            config.matchers = parse_matcher_list(&names);
        }
    }
}

fn required<'a>(path: &'a Option<PathBuf>, what: &str) -> Result<&'a Path> {
    path.as_deref()
        .with_context(|| format!("No {} input configured (CLI flag or AFFMATCH_* variable)", what))
}

/// Reads a relation file on the blocking pool, or nothing when not configured.
async fn load_document_projects(path: Option<PathBuf>) -> Result<Vec<DocumentProject>> {
    match path {
        Some(path) => tokio::task::spawn_blocking(move || read_document_projects(&path))
            .await
            .context("Document-project reader task panicked")?,
        None => Ok(Vec::new()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env first so RUST_LOG set there reaches the logger
    let env_source = load_env();
    env_logger::init();
    let args = Args::parse();
    if args.print_env_example {
        print_env_config_example();
        return Ok(());
    }
    info!("Starting affiliation to organization matching");
    log_env_source(env_source);

    let mut config = MatchingRunConfig::from_env().context("Invalid AFFMATCH_* environment configuration")?;
    args.apply(&mut config);
    config.validate().context("Invalid run configuration")?;
    config.log_config();

    let progress_config = ProgressConfig::from_env();
    info!(
        "Progress tracking: enabled={}, detailed={}",
        progress_config.enabled, progress_config.detailed
    );
    let multi_progress = progress_config.create_multi_progress();
    let main_pb = if let Some(mp) = &multi_progress {
        let pb = mp.add(ProgressBar::new(3));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        pb.set_message("Loading inputs...");
        Some(pb)
    } else {
        None
    };

    let run_id = Uuid::new_v4().to_string();
    let run_timestamp = Utc::now().naive_utc();
    let mut phase_times = HashMap::new();

    // Phase 1: Loading inputs
    let phase1_start = Instant::now();
    info!("Phase 1: Loading inputs...");
    let affiliations_path = required(&config.affiliations_path, "affiliations")?.to_path_buf();
    let organizations_path = required(&config.organizations_path, "organizations")?.to_path_buf();
    let alt_names_path = config.alt_names_path.clone();
    let project_organizations_path = config.project_organizations_path.clone();

    let (affiliations, organizations, alt_names, imported, inferred, project_organizations) = futures::try_join!(
        async move {
            tokio::task::spawn_blocking(move || read_affiliations(&affiliations_path))
                .await
                .context("Affiliation reader task panicked")?
        },
        async move {
            tokio::task::spawn_blocking(move || read_organizations(&organizations_path))
                .await
                .context("Organization reader task panicked")?
        },
        async move {
            match alt_names_path {
                Some(path) => tokio::task::spawn_blocking(move || AltNameDictionary::from_path(&path))
                    .await
                    .context("Alternative names reader task panicked")?,
                None => Ok(AltNameDictionary::default()),
            }
        },
        load_document_projects(config.document_projects_path.clone()),
        load_document_projects(config.inferred_document_projects_path.clone()),
        async move {
            match project_organizations_path {
                Some(path) => tokio::task::spawn_blocking(move || read_project_organizations(&path))
                    .await
                    .context("Project-organization reader task panicked")?,
                None => Ok(Vec::new()),
            }
        },
    )?;

    let document_organizations: Vec<DocumentOrganization> = if config.has_relation_inputs() {
        build_document_organizations(
            &imported,
            &inferred,
            &project_organizations,
            config.min_document_project_confidence,
            config.join_partitions,
        )
        .context("Failed to derive document-organization relations")?
    } else {
        Vec::new()
    };

    let phase1_duration = phase1_start.elapsed();
    phase_times.insert("loading", phase1_duration);
    info!(
        "Loaded {} affiliations, {} organizations, {} document-organization relations in {:.2?}. Phase 1 complete.",
        affiliations.len(),
        organizations.len(),
        document_organizations.len(),
        phase1_duration
    );
    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.set_message("Phase 2: Matching");
    }

    // Phase 2: Matching
    let phase2_start = Instant::now();
    info!("Phase 2: Matching starting...");
    let matchers = config
        .matchers
        .iter()
        .map(preset_matcher)
        .collect::<affmatch_lib::Result<Vec<_>>>()
        .context("Failed to build matchers")?;
    let engine = MatchingEngine::new(matchers, config.join_partitions, Arc::new(alt_names))
        .context("Failed to build matching engine")?
        .with_run_id(run_id.clone())
        .with_progress(multi_progress.clone(), progress_config.should_show_detailed());

    let total_affiliations = affiliations.len();
    let total_organizations = organizations.len();
    let total_document_organizations = document_organizations.len();
    let outcome = tokio::task::spawn_blocking(move || {
        engine.match_affiliations(&affiliations, &organizations, &document_organizations)
    })
    .await
    .context("Matching task panicked")?;

    let phase2_duration = phase2_start.elapsed();
    phase_times.insert("matching", phase2_duration);
    info!(
        "Selected {} final matches in {:.2?}. Phase 2 complete.",
        outcome.matches.len(),
        phase2_duration
    );
    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.set_message("Phase 3: Writing results");
    }

    // Phase 3: Writing results
    let phase3_start = Instant::now();
    let output_dir = config.output_dir.clone();
    let number_of_output_files = config.number_of_output_files;
    let matches = outcome.matches;
    let (paths, matches) = tokio::task::spawn_blocking(move || {
        write_matches(&output_dir, &matches, number_of_output_files).map(|paths| (paths, matches))
    })
    .await
    .context("Writer task panicked")?
    .context("Failed to write matched organizations")?;
    let phase3_duration = phase3_start.elapsed();
    phase_times.insert("writing", phase3_duration);
    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.finish_with_message(format!("Done: {} matches", matches.len()));
    }

    let summary = RunSummary {
        run_id: run_id.clone(),
        run_timestamp,
        total_affiliations,
        total_organizations,
        total_document_organizations,
        total_final_matches: matches.len(),
        matching_time: phase2_duration.as_secs_f64(),
        matcher_stats: outcome.matcher_stats,
    };

    // Print comprehensive summary
    let total_time = phase1_duration + phase2_duration + phase3_duration;
    info!("=== Pipeline Summary ===");
    info!("Run ID: {}", summary.run_id);
    info!("Run timestamp: {}", summary.run_timestamp);
    info!("Total affiliations: {}", summary.total_affiliations);
    info!("Total organizations: {}", summary.total_organizations);
    info!("Total document-organization relations: {}", summary.total_document_organizations);
    info!("Total final matches: {}", summary.total_final_matches);
    info!("Output files: {}", paths.len());
    info!("=== Timing Breakdown ===");
    info!("Phase 1 (Loading): {:.2?}", phase1_duration);
    info!("Phase 2 (Matching): {:.2?}", phase2_duration);
    info!("Phase 3 (Writing): {:.2?}", phase3_duration);
    info!("Total execution time: {:.2?}", total_time);

    if progress_config.should_show_memory() {
        let final_memory_mb = get_memory_usage().await;
        info!("Final memory usage: {} MB", final_memory_mb);
    }

    if progress_config.should_show_matcher_stats() && !summary.matcher_stats.is_empty() {
        info!("=== Matcher Statistics ===");
        for stats in &summary.matcher_stats {
            info!(
                "{}: {} candidate pairs, {} results, {} affiliations, avg strength: {:.3}",
                stats.matcher, stats.candidate_pairs, stats.match_results, stats.affiliations_matched, stats.avg_match_strength
            );
        }
    }
    debug!(
        "Run summary: {}",
        serde_json::to_string(&summary).unwrap_or_default()
    );
    debug!("Phase times: {:?}", phase_times);

    info!("Pipeline completed successfully!");
    Ok(())
}
