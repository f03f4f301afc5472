// Resume analysis core: segmentation, date ranges, experience, skills, education, scoring.
// Pure and synchronous; no collaborator calls happen in here.

pub mod education;
pub mod experience;
pub mod scoring;
pub mod segmenter;
pub mod skills;
pub mod temporal;

use serde::Serialize;

use crate::models::resume::{SectionKind, SectionSpan, YearRange};
use crate::models::screening::{CandidateSignals, MandatorySkillStatus, RequirementProfile, Verdict};

/// Everything the deterministic core derives from one resume.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateAnalysis {
    pub sections: Vec<SectionSpan>,
    pub work_ranges: Vec<YearRange>,
    pub signals: CandidateSignals,
    pub verdict: Verdict,
    pub eligible: bool,
}

/// Flattens page breaks and CRLF line endings to `\n`.
pub fn normalize_text(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace(['\r', '\u{c}'], "\n")
}

/// Segments one document, derives its signals from the relevant spans, and scores them.
///
/// Sections that are missing degrade to: no ranges (experience 0), whole-document
/// skill search, and no degree.
pub fn analyze_candidate(
    text: &str,
    profile: &RequirementProfile,
    mandatory_skills: MandatorySkillStatus,
    current_year: i32,
) -> CandidateAnalysis {
    let sections = segmenter::segment(text);
    let span_text = |kind: SectionKind| {
        segmenter::find_span(&sections, kind).map(|span| span.text(text))
    };

    let work_ranges =
        temporal::extract_ranges_from(span_text(SectionKind::WorkExperience), current_year);
    let experience_years = experience::aggregate(&work_ranges);
    let matched_skills =
        skills::match_skills_in(span_text(SectionKind::Skills), text, &profile.required_skills);
    let education = education::classify(span_text(SectionKind::Education));

    let signals = CandidateSignals {
        experience_years,
        education,
        matched_skills,
        mandatory_skills,
    };
    let verdict = scoring::score(&signals, profile);
    let eligible = verdict.is_shortlist_eligible();

    CandidateAnalysis {
        sections,
        work_ranges,
        signals,
        verdict,
        eligible,
    }
}
