use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::resume::DegreeTier;

/// Recruiter-specified hard gates and the skill list used for ranking.
///
/// Built only through `screening::profile`, which guarantees at least one required skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementProfile {
    pub min_experience_years: u32,
    pub min_education_tier: DegreeTier,
    /// Ordered, de-duplicated.
    pub required_skills: Vec<String>,
    /// Empty means no mandatory-skill gate.
    pub mandatory_skill_years: BTreeMap<String, u32>,
}

impl RequirementProfile {
    pub fn has_mandatory_skills(&self) -> bool {
        !self.mandatory_skill_years.is_empty()
    }
}

/// Binary outcome of a mandatory-skill years check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillStatus {
    #[serde(rename = "meets")]
    Meets,
    #[serde(rename = "does not meet")]
    DoesNotMeet,
}

/// Mandatory-skill evaluation result for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "skills")]
pub enum MandatorySkillStatus {
    /// The profile has no mandatory skills; the gate passes vacuously.
    NotApplicable,
    Evaluated(BTreeMap<String, SkillStatus>),
}

/// The four signals extracted from one resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSignals {
    pub experience_years: u32,
    pub education: Option<DegreeTier>,
    pub matched_skills: Vec<String>,
    pub mandatory_skills: MandatorySkillStatus,
}

/// Multi-part evaluation of a candidate against a profile. Every part is always computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub passes_experience: bool,
    pub passes_education: bool,
    pub mandatory_skill_fraction: f64,
    pub skill_coverage_fraction: f64,
    pub matched_skill_count: usize,
}

impl Verdict {
    /// All hard gates pass: experience, education, and every mandatory skill.
    pub fn is_shortlist_eligible(&self) -> bool {
        self.passes_experience
            && self.passes_education
            && (self.mandatory_skill_fraction - 1.0).abs() < f64::EPSILON
    }
}

/// Contact details pulled from the resume. `None` is the absent-value marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
