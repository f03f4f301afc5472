//! Education Classifier: highest degree tier mentioned in the education span.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::DegreeTier;

/// Evaluated top to bottom; the first tier with a hit wins.
static DEGREE_PATTERNS: Lazy<Vec<(DegreeTier, Regex)>> = Lazy::new(|| {
    let patterns: [(DegreeTier, &str); 4] = [
        (
            DegreeTier::PhD,
            r"(?i)\b(?:ph\.?\s?d\b|d\.?phil\b|doctor\s+of\s+philosophy|doctorate)",
        ),
        (
            DegreeTier::Master,
            r"(?i)\b(?:master(?:['’]?s)?\b|m\.?sc\b|m\.?s\b\.?|m\.?eng\b|m\.b\.a\b|mba\b|m\.a\.|ma\b)",
        ),
        (
            DegreeTier::Bachelor,
            r"(?i)\b(?:bachelor(?:['’]?s)?\b|b\.?sc\b|b\.?eng\b|b\.?tech\b|bba\b|b\.?a\b|b\.?s\b)",
        ),
        (
            DegreeTier::Diploma,
            r"(?i)\b(?:diploma|associate(?:['’]?s)?(?:\s+degree)?)\b",
        ),
    ];

    patterns
        .into_iter()
        .map(|(tier, pattern)| (tier, Regex::new(pattern).expect("static degree pattern")))
        .collect()
});

/// Returns the highest tier found, or `None` when nothing matches.
///
/// An absent span is searched as empty text and therefore yields `None`.
pub fn classify(span: Option<&str>) -> Option<DegreeTier> {
    let text = span.unwrap_or("");
    DEGREE_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(tier, _)| *tier)
}
