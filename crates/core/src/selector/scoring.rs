//! Deterministic text-match scoring for candidate selection.
//!
//! A query matches a product field at one of three strengths, scored so
//! they never overlap: exact equality (1.0) beats substring containment
//! (0.7), which beats token overlap (at most 0.5). A product's score is
//! the best field score across product line, category, and name; zero
//! means the product is not a candidate at all.

/// Score for an exact (normalized) field match.
pub const EXACT_MATCH_SCORE: f64 = 1.0;

/// Score for a substring match in either direction.
pub const SUBSTRING_MATCH_SCORE: f64 = 0.7;

/// Ceiling for token-overlap scores: `0.5 * |query ∩ field| / |query|`.
pub const TOKEN_OVERLAP_WEIGHT: f64 = 0.5;

pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Match strength of `query` against a single product field, or `None`
/// when the field does not match at all.
pub fn field_score(query: &str, field: &str) -> Option<f64> {
    let query = normalize(query);
    let field = normalize(field);
    if query.is_empty() || field.is_empty() {
        return None;
    }

    if query == field {
        return Some(EXACT_MATCH_SCORE);
    }
    if field.contains(&query) || query.contains(&field) {
        return Some(SUBSTRING_MATCH_SCORE);
    }

    let query_tokens = tokenize(&query);
    if query_tokens.is_empty() {
        return None;
    }
    let field_tokens = tokenize(&field);
    let overlap =
        query_tokens.iter().filter(|token| field_tokens.contains(token)).count();
    if overlap == 0 {
        return None;
    }

    Some(TOKEN_OVERLAP_WEIGHT * overlap as f64 / query_tokens.len() as f64)
}

/// Best match strength across the fields a caller provides, in the
/// order they are provided. `None` excludes the product.
pub fn best_field_score<'a>(
    query: &str,
    fields: impl IntoIterator<Item = Option<&'a str>>,
) -> Option<f64> {
    fields
        .into_iter()
        .flatten()
        .filter_map(|field| field_score(query, field))
        .fold(None, |best, score| match best {
            Some(current) if current >= score => Some(current),
            _ => Some(score),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_beats_substring_match() {
        let exact = field_score("Cleaner", "cleaner").expect("exact should match");
        let substring = field_score("Cleaner", "Steam Cleaner").expect("substring should match");
        assert_eq!(exact, EXACT_MATCH_SCORE);
        assert_eq!(substring, SUBSTRING_MATCH_SCORE);
        assert!(exact > substring);
    }

    #[test]
    fn substring_match_beats_token_overlap() {
        let substring = field_score("Pump", "Heat Pumps").expect("substring should match");
        let overlap = field_score("Pump Spares", "Pump Oil").expect("tokens should overlap");
        assert!(substring > overlap);
    }

    #[test]
    fn token_overlap_is_proportional_to_query_coverage() {
        let half = field_score("heat pump", "pump oil").expect("one of two tokens");
        let full = field_score("pump", "pump oil").expect("substring");
        assert_eq!(half, TOKEN_OVERLAP_WEIGHT * 0.5);
        assert_eq!(full, SUBSTRING_MATCH_SCORE);
    }

    #[test]
    fn unrelated_text_is_excluded() {
        assert_eq!(field_score("Cleaner", "Boiler"), None);
        assert_eq!(field_score("", "Boiler"), None);
        assert_eq!(field_score("Cleaner", ""), None);
    }

    #[test]
    fn matching_ignores_case_and_whitespace() {
        assert_eq!(field_score("  VFD ", "vfd"), Some(EXACT_MATCH_SCORE));
    }

    #[test]
    fn best_field_score_takes_strongest_field() {
        let score = best_field_score("Cleaner", [Some("Industrial"), Some("Cleaner"), None]);
        assert_eq!(score, Some(EXACT_MATCH_SCORE));
    }

    #[test]
    fn best_field_score_skips_missing_fields() {
        assert_eq!(best_field_score("Cleaner", [None, None]), None);
    }

    #[test]
    fn tokenize_splits_on_non_alphanumerics() {
        assert_eq!(tokenize("VFD-Spares, large"), vec!["vfd", "spares", "large"]);
    }
}
