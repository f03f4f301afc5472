//! Skill Matcher: whole-word, case-insensitive containment of required skills.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

/// Lower-cases, turns hyphens into spaces, and collapses whitespace runs (newlines included).
///
/// Applied to both the searched text and each skill, so "Front-End" and "front end" meet.
pub fn normalize_for_matching(text: &str) -> String {
    let lowered = text.to_lowercase().replace('-', " ");
    WHITESPACE_RUN
        .replace_all(lowered.trim(), " ")
        .into_owned()
}

/// Returns the required skills that occur in `text` as whole words, in `required` order.
///
/// A skill matches only when it is bounded on both sides by a non-word character or
/// the text edge, so "java" does not match inside "javascript" while "c++" and ".net"
/// still match next to punctuation.
pub fn match_skills(text: &str, required: &[String]) -> Vec<String> {
    let haystack = normalize_for_matching(text);

    required
        .iter()
        .filter(|skill| contains_whole_word(&haystack, &normalize_for_matching(skill)))
        .cloned()
        .collect()
}

/// Searches the Skills span when there is one, otherwise the whole document.
pub fn match_skills_in(span: Option<&str>, document: &str, required: &[String]) -> Vec<String> {
    match_skills(span.unwrap_or(document), required)
}

fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let pattern = format!(r"(?:^|[^\w]){}(?:[^\w]|$)", regex::escape(needle));
    Regex::new(&pattern)
        .map(|re| re.is_match(haystack))
        .unwrap_or(false)
}
