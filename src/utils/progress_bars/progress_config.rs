// src/utils/progress_bars/progress_config.rs

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::env;

/// Configuration for progress display during a matching run
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Whether to show progress bars at all
    pub enabled: bool,
    /// Whether to show a bar per matcher in addition to the run bar
    pub detailed: bool,
    /// Refresh rate for progress bars in milliseconds
    pub refresh_rate_ms: u64,
    /// Whether to report memory usage in the run summary
    pub show_memory: bool,
    /// Whether to log the per-matcher breakdown at the end of the run
    pub show_matcher_stats: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            detailed: true,
            refresh_rate_ms: 100,
            show_memory: true,
            show_matcher_stats: true,
        }
    }
}

impl ProgressConfig {
    /// Create progress configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("PROGRESS_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            detailed: env::var("PROGRESS_DETAILED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            refresh_rate_ms: env::var("PROGRESS_REFRESH_RATE_MS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            show_memory: env::var("PROGRESS_SHOW_MEMORY")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            show_matcher_stats: env::var("PROGRESS_SHOW_MATCHER_STATS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        }
    }

    /// Create a MultiProgress instance if progress is enabled, None otherwise
    pub fn create_multi_progress(&self) -> Option<MultiProgress> {
        if self.enabled {
            Some(MultiProgress::new())
        } else {
            None
        }
    }

    pub fn should_show_detailed(&self) -> bool {
        self.enabled && self.detailed
    }

    pub fn should_show_memory(&self) -> bool {
        self.enabled && self.show_memory
    }

    pub fn should_show_matcher_stats(&self) -> bool {
        self.enabled && self.show_matcher_stats
    }
}

/// Bar style shared by the run bar and the per-matcher bars.
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  {spinner:.blue} [{elapsed_precise}] {bar:30.green/blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
}

/// Adds a styled bar of `len` steps to `multi_progress`, if there is one.
pub fn add_bar(multi_progress: Option<&MultiProgress>, len: u64, message: String) -> Option<ProgressBar> {
    multi_progress.map(|mp| {
        let pb = mp.add(ProgressBar::new(len));
        pb.set_style(bar_style());
        pb.set_message(message);
        pb
    })
}

/// Environment variable configuration example
pub fn print_env_config_example() {
    println!("# Progress Tracking Configuration");
    println!("# Set these environment variables to configure progress behavior:");
    println!();
    println!("# Enable/disable all progress bars (default: true)");
    println!("export PROGRESS_ENABLED=true");
    println!();
    println!("# Show a bar per matcher (default: true)");
    println!("export PROGRESS_DETAILED=true");
    println!();
    println!("# Progress bar refresh rate in milliseconds (default: 100)");
    println!("export PROGRESS_REFRESH_RATE_MS=100");
    println!();
    println!("# Report memory usage in the run summary (default: true)");
    println!("export PROGRESS_SHOW_MEMORY=true");
    println!();
    println!("# Log the per-matcher breakdown (default: true)");
    println!("export PROGRESS_SHOW_MATCHER_STATS=true");
    println!();
    println!("# For minimal output (CI/automated environments):");
    println!("export PROGRESS_ENABLED=false");
    println!("export PROGRESS_DETAILED=false");
}
