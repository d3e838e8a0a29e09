// src/utils/env.rs - .env loading for the binary
use log::info;
use std::path::Path;

const ENV_PATHS: [&str; 3] = [".env", ".env.local", "../.env"];

/// Loads the first `.env` file found and returns its path. Variables already
/// set in the process environment are never overridden. Runs before the
/// logger exists, so failures go to stderr.
pub fn load_env() -> Option<&'static str> {
    for path in ENV_PATHS {
        if Path::new(path).exists() {
            match dotenv::from_path(path) {
                Ok(()) => return Some(path),
                Err(e) => eprintln!("Failed to load environment from {}: {}", path, e),
            }
        }
    }
    None
}

/// Reports the outcome of [`load_env`] once logging is up.
pub fn log_env_source(source: Option<&str>) {
    match source {
        Some(path) => info!("Loaded environment variables from {}", path),
        None => info!("No .env file found, using environment variables from system"),
    }
}
