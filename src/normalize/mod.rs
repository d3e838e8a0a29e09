// src/normalize/mod.rs
pub mod country;
pub mod text;

pub use country::normalize_country_code;
pub use text::{
    filter_chars, filter_chars_and_short_words, main_section_tokens, normalize_for_comparison,
    normalize_name, tokenize_name,
};
