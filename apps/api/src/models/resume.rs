use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logical resume sections recognised by the segmenter.
///
/// Declaration order doubles as the tie-break priority when two headers
/// start at the same offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    WorkExperience,
    Education,
    Skills,
    Projects,
    Certifications,
}

impl SectionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Summary => "Summary",
            SectionKind::WorkExperience => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Projects => "Projects",
            SectionKind::Certifications => "Certifications",
        }
    }
}

/// A contiguous byte range of the normalized resume text attributed to one heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpan {
    pub name: SectionKind,
    pub start: usize,
    pub end: usize,
}

impl SectionSpan {
    /// Borrows the span's text out of the document it was derived from.
    pub fn text<'a>(&self, document: &'a str) -> &'a str {
        document.get(self.start..self.end).unwrap_or("")
    }
}

/// One stated period, in calendar years.
///
/// `ongoing` ranges ("Present", "Current") already carry the evaluation year in `end`.
/// A bare year is a single-point range with `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
    pub ongoing: bool,
}

impl YearRange {
    pub fn closed(start: i32, end: i32) -> Self {
        Self {
            start,
            end,
            ongoing: false,
        }
    }

    pub fn ongoing(start: i32, current_year: i32) -> Self {
        Self {
            start,
            end: current_year,
            ongoing: true,
        }
    }

    pub fn point(year: i32) -> Self {
        Self::closed(year, year)
    }
}

/// Academic credential ranking. Variant order is the ranking: Diploma < Bachelor < Master < PhD.
///
/// "No degree" is `Option::<DegreeTier>::None`, which `Option`'s ordering already
/// places below every real tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DegreeTier {
    Diploma,
    Bachelor,
    Master,
    #[serde(rename = "PhD")]
    PhD,
}

impl fmt::Display for DegreeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DegreeTier::Diploma => "Diploma",
            DegreeTier::Bachelor => "Bachelor",
            DegreeTier::Master => "Master",
            DegreeTier::PhD => "PhD",
        };
        f.write_str(label)
    }
}

impl FromStr for DegreeTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diploma" => Ok(DegreeTier::Diploma),
            "bachelor" | "bachelors" | "bachelor's" => Ok(DegreeTier::Bachelor),
            "master" | "masters" | "master's" => Ok(DegreeTier::Master),
            "phd" | "ph.d" | "ph.d." | "doctorate" => Ok(DegreeTier::PhD),
            other => Err(format!(
                "unknown education tier '{other}' (expected Diploma, Bachelor, Master or PhD)"
            )),
        }
    }
}
