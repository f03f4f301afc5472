//! Temporal Range Extractor: pulls (start, end) year pairs out of a section's text.
//!
//! Primary pass: `[Month] YYYY <sep> [Month] YYYY` or `[Month] YYYY <sep> Present|Current`.
//! Month tokens are tolerated but ignored. The separator is a dash variant, the word
//! "to", or plain whitespace (bullet cleanup on reorganized text can strip dashes).
//! Fallback pass (only when the primary pass finds nothing): every standalone 19xx/20xx
//! year becomes a single-point range.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::YearRange;

static PAIRED_RANGE: Lazy<Regex> = Lazy::new(|| {
    let month = r"(?:january|february|march|april|may|june|july|august|september|october|november|december|sept|jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec)\.?";
    let pattern = format!(
        r"(?i)\b(?:{month})?\s*(\d{{4}})\b(?:\s*[-‐‑‒–—―]?\s*|\s*\bto\b\s*)(?:\b(?:{month})?\s*(\d{{4}})\b|\b(present|current)\b)"
    );
    Regex::new(&pattern).expect("static date range pattern")
});

static STANDALONE_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("static year pattern"));

/// Extracts year ranges in document order. `current_year` resolves "Present"/"Current".
pub fn extract_ranges(span_text: &str, current_year: i32) -> Vec<YearRange> {
    let ranges: Vec<YearRange> = PAIRED_RANGE
        .captures_iter(span_text)
        .filter_map(|caps| {
            let start = caps.get(1)?.as_str().parse::<i32>().ok()?;
            if caps.get(3).is_some() {
                return Some(YearRange::ongoing(start, current_year));
            }
            let end = caps.get(2)?.as_str().parse::<i32>().ok()?;
            Some(YearRange::closed(start, end))
        })
        .collect();

    if !ranges.is_empty() {
        return ranges;
    }

    STANDALONE_YEAR
        .find_iter(span_text)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .map(YearRange::point)
        .collect()
}

/// Same as [`extract_ranges`] but accepts an absent span, which yields no ranges.
pub fn extract_ranges_from(span_text: Option<&str>, current_year: i32) -> Vec<YearRange> {
    span_text
        .map(|text| extract_ranges(text, current_year))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2025;

    #[test]
    fn test_month_year_pair() {
        let ranges = extract_ranges("Acme Corp — Jan 2018 - Dec 2020", YEAR);
        assert_eq!(ranges, vec![YearRange::closed(2018, 2020)]);
    }

    #[test]
    fn test_present_resolves_to_current_year() {
        let ranges = extract_ranges("Globex, 2019 to Present", YEAR);
        assert_eq!(ranges, vec![YearRange::ongoing(2019, YEAR)]);
        assert_eq!(ranges[0].end, YEAR);
    }

    #[test]
    fn test_current_keyword_case_insensitive() {
        let ranges = extract_ranges("March 2022 – current", YEAR);
        assert_eq!(ranges, vec![YearRange::ongoing(2022, YEAR)]);
    }

    #[test]
    fn test_full_month_names_and_dash_variants() {
        let text = "September 2015 — August 2017\nOctober 2017–November 2019\nJune 2020 ‒ May 2021";
        let ranges = extract_ranges(text, YEAR);
        assert_eq!(
            ranges,
            vec![
                YearRange::closed(2015, 2017),
                YearRange::closed(2017, 2019),
                YearRange::closed(2020, 2021),
            ]
        );
    }

    #[test]
    fn test_to_separator_with_months() {
        let ranges = extract_ranges("Worked there from Feb 2010 to Nov 2013.", YEAR);
        assert_eq!(ranges, vec![YearRange::closed(2010, 2013)]);
    }

    #[test]
    fn test_dashless_pair_still_matches() {
        let ranges = extract_ranges("Analyst 2016 2018", YEAR);
        assert_eq!(ranges, vec![YearRange::closed(2016, 2018)]);
    }

    #[test]
    fn test_document_order_is_preserved() {
        let text = "2021 - 2023 Initech\n2018 - 2020 Acme";
        let ranges = extract_ranges(text, YEAR);
        assert_eq!(
            ranges,
            vec![YearRange::closed(2021, 2023), YearRange::closed(2018, 2020)]
        );
    }

    #[test]
    fn test_fallback_to_standalone_years() {
        let ranges = extract_ranges("Graduated in 2012; promoted in 2016.", YEAR);
        assert_eq!(ranges, vec![YearRange::point(2012), YearRange::point(2016)]);
    }

    #[test]
    fn test_fallback_ignores_non_year_numbers() {
        let ranges = extract_ranges("Managed 1500 users and a 3000 budget in 2014.", YEAR);
        assert_eq!(ranges, vec![YearRange::point(2014)]);
    }

    #[test]
    fn test_fallback_not_used_when_pairs_exist() {
        let ranges = extract_ranges("2015 - 2017, award in 2019.", YEAR);
        assert_eq!(ranges, vec![YearRange::closed(2015, 2017)]);
    }

    #[test]
    fn test_no_years_yields_empty() {
        assert!(extract_ranges("No dates here at all", YEAR).is_empty());
    }

    #[test]
    fn test_absent_span_yields_empty() {
        assert!(extract_ranges_from(None, YEAR).is_empty());
        assert_eq!(
            extract_ranges_from(Some("2019 - 2020"), YEAR),
            vec![YearRange::closed(2019, 2020)]
        );
    }
}
