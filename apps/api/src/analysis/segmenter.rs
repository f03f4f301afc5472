//! Section Segmenter: locates section headers and derives ordered, non-overlapping spans.
//!
//! A header must sit on its own line. Only the first header of each kind counts;
//! spans run from one header to the next found header (or the end of the document).

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::models::resume::{SectionKind, SectionSpan};

/// Header patterns in priority order. The order resolves identical-offset collisions.
static SECTION_HEADERS: Lazy<Vec<(SectionKind, Regex)>> = Lazy::new(|| {
    let patterns: [(SectionKind, &str); 6] = [
        (
            SectionKind::Summary,
            r"(?im)^[ \t]*(?:\w+[ \t]+)?(?:summary|objective|profile)[ \t]*:?[ \t]*$",
        ),
        (
            SectionKind::WorkExperience,
            r"(?im)^[ \t]*(?:(?:(?:work|job|professional|employment|relevant)[ \t]+)?experiences?|(?:work|employment)[ \t]+history)[ \t]*:?[ \t]*$",
        ),
        (
            SectionKind::Education,
            r"(?im)^[ \t]*(?:education|academic|educational)[ \t]*(?:(?:and|&)[ \t]*)?(?:\w+[ \t]+)?(?:background|history|qualifications?|degrees?|training)?[ \t]*:?[ \t]*$",
        ),
        (
            SectionKind::Skills,
            r"(?im)^[ \t]*(?:\w+[ \t]+)?skills?(?:[ \t]*\w+)?(?:[ \t]*(?:and|&)[ \t]*(?:competencies|expertise|tools))?[ \t]*:?[ \t]*$",
        ),
        (
            SectionKind::Projects,
            r"(?im)^[ \t]*(?:(?:personal|academic|side|research|open[ \t]+source)[ \t]+)?projects?[ \t]*:?[ \t]*$",
        ),
        (
            SectionKind::Certifications,
            r"(?im)^[ \t]*(?:\w+[ \t]*(?:and|&)?[ \t]+)?(?:certificates?|certifications?)[ \t]*:?[ \t]*$",
        ),
    ];

    patterns
        .into_iter()
        .map(|(kind, pattern)| {
            (
                kind,
                Regex::new(pattern).expect("static section header pattern"),
            )
        })
        .collect()
});

/// Splits `text` into section spans ordered by position.
///
/// Sections without a header produce no span. When two kinds match at the same
/// offset, the kind declared first in `SectionKind` keeps it.
pub fn segment(text: &str) -> Vec<SectionSpan> {
    let mut found: Vec<(SectionKind, usize)> = Vec::with_capacity(SECTION_HEADERS.len());

    for (kind, pattern) in SECTION_HEADERS.iter() {
        let Some(header) = pattern.find(text) else {
            continue;
        };
        let offset = header.start();

        if let Some((winner, _)) = found.iter().find(|(_, existing)| *existing == offset) {
            warn!(
                "Segmentation ambiguity at offset {offset}: '{}' and '{}' both match; keeping '{}'",
                winner.label(),
                kind.label(),
                winner.label()
            );
            continue;
        }

        found.push((*kind, offset));
    }

    // Stable sort keeps priority order for equal offsets (already de-duplicated above).
    found.sort_by_key(|(_, offset)| *offset);

    found
        .iter()
        .enumerate()
        .map(|(i, (kind, start))| SectionSpan {
            name: *kind,
            start: *start,
            end: found.get(i + 1).map(|(_, next)| *next).unwrap_or(text.len()),
        })
        .collect()
}

/// Looks up the span for `kind`, if the document has one.
pub fn find_span(spans: &[SectionSpan], kind: SectionKind) -> Option<&SectionSpan> {
    spans.iter().find(|span| span.name == kind)
}
