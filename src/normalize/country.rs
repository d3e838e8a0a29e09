// src/normalize/country.rs

/// Country codes that differ from their ISO 3166-1 alpha-2 form.
const CODE_REPLACEMENTS: [(&str, &str); 2] = [("uk", "gb"), ("el", "gr")];

/// Lowercased, trimmed ISO alpha-2 code; empty when missing or blank.
pub fn normalize_country_code(code: Option<&str>) -> String {
    let Some(code) = code else {
        return String::new();
    };
    let code = code.trim().to_lowercase();
    CODE_REPLACEMENTS
        .iter()
        .find(|(from, _)| *from == code)
        .map(|(_, to)| to.to_string())
        .unwrap_or(code)
}
