// src/utils/constants.rs

/// Number of part files the matched organizations are written to.
pub const DEFAULT_OUTPUT_FILES: usize = 4;

/// Chars removed from names before the name voters compare them.
pub const NAME_FILTER_CHARS: [char; 5] = [',', ';', '.', '"', ':'];

/// Words of at most this many chars are ignored by the word-overlap voters.
pub const SHORT_WORD_MAX_LENGTH: usize = 2;

pub const OUTPUT_PART_PREFIX: &str = "part-";
pub const OUTPUT_PART_EXTENSION: &str = "jsonl";
