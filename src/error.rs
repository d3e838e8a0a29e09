// src/error.rs - Error types for the matching engine
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatchingError>;

/// Errors raised by the matching engine.
///
/// Every variant is a configuration or contract problem detected before any
/// candidate pair is scored. Per-record data problems (empty names, missing
/// country codes) are never reported here; the affected record just does not match.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchingError {
    #[error("no match voters configured for matcher '{0}'")]
    NoVoters(String),

    #[error("invalid voter configuration: {0}")]
    InvalidVoterConfig(String),

    #[error("invalid hasher configuration: {0}")]
    InvalidHasherConfig(String),

    #[error("invalid engine configuration: {0}")]
    InvalidEngineConfig(String),

    #[error("invalid relation: {0}")]
    InvalidRelation(String),
}
