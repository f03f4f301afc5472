//! Requirement profile decoding and fail-fast validation.
//!
//! A profile is checked once, before any document is touched. A bad profile aborts the
//! whole screening; nothing downstream re-validates it.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use thiserror::Error;

use crate::models::resume::DegreeTier;
use crate::models::screening::RequirementProfile;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("at least one required skill must be provided")]
    NoRequiredSkills,

    #[error("mandatory skill '{0}' is not one of the required skills")]
    UnknownMandatorySkill(String),

    #[error("mandatory skill '{0}' is listed more than once")]
    DuplicateMandatorySkill(String),

    #[error("{0}")]
    UnknownEducationTier(String),
}

/// Wire shape of a requirement profile, as submitted by a recruiter.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    pub min_experience_years: u32,
    pub min_education: String,
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub mandatory_skill_years: BTreeMap<String, u32>,
}

impl ProfileRequest {
    pub fn validate(self) -> Result<RequirementProfile, ConfigurationError> {
        let min_education_tier = self
            .min_education
            .parse::<DegreeTier>()
            .map_err(ConfigurationError::UnknownEducationTier)?;

        let mut seen = HashSet::new();
        let required_skills: Vec<String> = self
            .required_skills
            .iter()
            .map(|skill| skill.trim())
            .filter(|skill| !skill.is_empty())
            .filter(|skill| seen.insert(skill.to_lowercase()))
            .map(str::to_string)
            .collect();

        if required_skills.is_empty() {
            return Err(ConfigurationError::NoRequiredSkills);
        }

        // Mandatory entries are re-keyed to the required-skill spelling.
        let mut mandatory_skill_years = BTreeMap::new();
        for (skill, years) in self.mandatory_skill_years {
            let wanted = skill.trim().to_lowercase();
            let canonical = required_skills
                .iter()
                .find(|required| required.to_lowercase() == wanted)
                .ok_or_else(|| ConfigurationError::UnknownMandatorySkill(skill.trim().to_string()))?;
            if mandatory_skill_years.insert(canonical.clone(), years).is_some() {
                return Err(ConfigurationError::DuplicateMandatorySkill(canonical.clone()));
            }
        }

        Ok(RequirementProfile {
            min_experience_years: self.min_experience_years,
            min_education_tier,
            required_skills,
            mandatory_skill_years,
        })
    }
}
