// src/normalize/text.rs - Name normalization shared by hashers and voters
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static RE_SECTION_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;()\[\]|]+").expect("invalid RE_SECTION_SEPARATORS"));
static RE_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid RE_WHITESPACE"));

pub const STOPWORDS: [&str; 24] = [
    "a", "an", "the", "and", "of", "for", "at", "in", "on", "to", "de", "la", "le", "les", "des",
    "du", "der", "die", "das", "und", "di", "del", "della", "et",
];

/// Words that open an organizational sub-unit rather than name the institution.
pub const UNIT_DESIGNATORS: [&str; 14] = [
    "department", "dept", "departamento", "faculty", "fac", "division", "div", "laboratory",
    "laboratories", "lab", "unit", "section", "chair", "group",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.into_iter().collect());
static UNIT_DESIGNATOR_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| UNIT_DESIGNATORS.into_iter().collect());

pub fn is_stopword(token: &str) -> bool {
    STOPWORD_SET.contains(token)
}

pub fn is_unit_designator(token: &str) -> bool {
    UNIT_DESIGNATOR_SET.contains(token)
}

/// Decomposes the text and drops combining marks, so "Łódź" keeps its base
/// letters where Unicode defines a decomposition ("Lodz" except for "Ł").
pub fn strip_diacritics(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Lowercase, diacritic-free form with punctuation intact. Used for strict
/// comparisons where only configured characters are filtered.
pub fn normalize_for_comparison(text: &str) -> String {
    collapse_whitespace(&strip_diacritics(text).to_lowercase())
}

/// Lowercase, diacritic-free, punctuation-free form of a name.
pub fn normalize_name(name: &str) -> String {
    let lowered = strip_diacritics(name).to_lowercase();
    let mut normalized = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match c {
            '\'' | '\u{2019}' | '`' => {}
            '&' => normalized.push_str(" and "),
            c if c.is_alphanumeric() => normalized.push(c),
            _ => normalized.push(' '),
        }
    }
    collapse_whitespace(&normalized)
}

/// Normalized tokens of a name without stop words.
pub fn tokenize_name(name: &str) -> Vec<String> {
    normalize_name(name)
        .split_whitespace()
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

/// Removes every occurrence of the given characters; no other change.
pub fn filter_chars(text: &str, chars_to_filter: &[char]) -> String {
    text.chars().filter(|c| !chars_to_filter.contains(c)).collect()
}

/// Removes the given characters, then drops words whose length is at most
/// `word_to_remove_max_length` characters. Zero keeps every word.
pub fn filter_chars_and_short_words(
    text: &str,
    chars_to_filter: &[char],
    word_to_remove_max_length: usize,
) -> String {
    filter_chars(text, chars_to_filter)
        .split_whitespace()
        .filter(|word| word.chars().count() > word_to_remove_max_length)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a raw name at separators (commas, semicolons, brackets) and returns
/// the stop-word-free tokens of every non-empty section.
pub fn split_sections(name: &str) -> Vec<Vec<String>> {
    RE_SECTION_SEPARATORS
        .split(name)
        .map(tokenize_name)
        .filter(|tokens| !tokens.is_empty())
        .collect()
}

/// Tokens of the section that names the institution itself.
///
/// A section mentioning a university wins. Otherwise the first section not
/// opened by a unit designator ("Department of ...") is taken, falling back
/// to the first section. The chosen section is cut at the first unit
/// designator following its head word.
pub fn main_section_tokens(name: &str) -> Vec<String> {
    let sections = split_sections(name);
    let chosen = sections
        .iter()
        .find(|tokens| tokens.iter().any(|t| t.starts_with("univ")))
        .or_else(|| {
            sections
                .iter()
                .find(|tokens| !tokens.first().map(|t| is_unit_designator(t)).unwrap_or(true))
        })
        .or_else(|| sections.first());

    let Some(tokens) = chosen else {
        return Vec::new();
    };

    let cut = tokens
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, t)| is_unit_designator(t))
        .map(|(idx, _)| idx)
        .unwrap_or(tokens.len());
    tokens[..cut].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Université  de Montréal "), "universite de montreal");
        assert_eq!(normalize_name("St. Mary's Hospital, London"), "st marys hospital london");
        assert_eq!(normalize_name("Johnson & Johnson"), "johnson and johnson");
        assert_eq!(normalize_name("!!!"), "");
    }

    #[test]
    fn test_normalize_for_comparison_keeps_punctuation() {
        assert_eq!(
            normalize_for_comparison("Mickey  Mouse's Ice Créams"),
            "mickey mouse's ice creams"
        );
    }

    #[test]
    fn test_tokenize_name_drops_stopwords() {
        assert_eq!(tokenize_name("University of the Arts"), vec!["university", "arts"]);
    }

    #[test]
    fn test_filter_chars() {
        assert_eq!(filter_chars("mickey mouse's, ice creams", &[',']), "mickey mouse's ice creams");
        assert_eq!(filter_chars("a-b-c", &[]), "a-b-c");
    }

    #[test]
    fn test_filter_chars_and_short_words() {
        assert_eq!(
            filter_chars_and_short_words("Department of Chemistry, University of Toronto", &[','], 2),
            "Department Chemistry University Toronto"
        );
        assert_eq!(filter_chars_and_short_words("of in at", &[], 2), "");
        assert_eq!(filter_chars_and_short_words("of in", &[], 0), "of in");
    }

    #[test]
    fn test_main_section_prefers_university_section() {
        assert_eq!(
            main_section_tokens("Department of Chemistry, University of Toronto, Canada"),
            vec!["university", "toronto"]
        );
    }

    #[test]
    fn test_main_section_skips_unit_section_and_cuts_at_designator() {
        assert_eq!(
            main_section_tokens("Dept. of Physics; Warsaw Institute of Technology"),
            vec!["warsaw", "institute", "technology"]
        );
        assert_eq!(
            main_section_tokens("Karolinska Institutet Department of Oncology"),
            vec!["karolinska", "institutet"]
        );
    }

    #[test]
    fn test_main_section_of_unparseable_name_is_empty() {
        assert!(main_section_tokens(" , ; () ").is_empty());
        assert!(main_section_tokens("").is_empty());
    }
}
